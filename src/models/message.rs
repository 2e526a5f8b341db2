//! Conversation turns exchanged with the gateway.

use serde::{Deserialize, Serialize};

use super::{Attachment, ContentPart, CustomContent, Role};

/// The body of a message: either plain text or ordered content parts.
///
/// The two shapes are distinct on the wire; a message serializes to whichever
/// one it was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// A plain string body.
    Text(String),
    /// A multimodal body.
    Parts(Vec<ContentPart>),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the turn.
    pub role: Role,
    /// The turn body.
    pub content: MessageContent,
    /// Attachments carried alongside the body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_content: Option<CustomContent>,
}

impl Message {
    /// Creates a message with the given role and body.
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
            custom_content: None,
        }
    }

    /// A system message with plain text.
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text.into())
    }

    /// A user message with plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into())
    }

    /// An assistant message with plain text.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text.into())
    }

    /// A user message made of content parts.
    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self::new(Role::User, parts)
    }

    /// Attaches custom content to the message.
    pub fn with_custom_content(mut self, custom_content: impl Into<CustomContent>) -> Self {
        self.custom_content = Some(custom_content.into());
        self
    }

    /// The text of the message. For multimodal bodies the text parts are
    /// joined with newlines; image parts are skipped.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(ContentPart::as_text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Attachments carried by the message, empty when there is no custom content.
    pub fn attachments(&self) -> &[Attachment] {
        self.custom_content
            .as_ref()
            .map(|content| content.attachments.as_slice())
            .unwrap_or_default()
    }
}
