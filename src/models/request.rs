//! Request models for the chat-completion endpoint.

use serde::Serialize;
use serde_json::{Map, Value};
use typed_builder::TypedBuilder;

use super::Message;

/// Free-form, vendor-specific generation parameters merged into the request body.
pub type CustomFields = Map<String, Value>;

/// A chat-completion request body.
///
/// Serializes as `{"messages": [...], ...custom_fields}`.
#[derive(Debug, Clone, Serialize, TypedBuilder)]
#[builder(doc)]
pub struct ChatCompletionRequest {
    /// The conversation so far, in order.
    pub messages: Vec<Message>,
    /// Extra top-level fields, passed through untouched.
    #[builder(default, setter(into))]
    #[serde(flatten)]
    pub custom_fields: CustomFields,
}

impl ChatCompletionRequest {
    /// Creates a request from messages and optional custom fields.
    ///
    /// A custom field named `messages` would shadow the conversation and is dropped.
    pub fn new(messages: Vec<Message>, custom_fields: Option<CustomFields>) -> Self {
        let mut custom_fields = custom_fields.unwrap_or_default();
        if custom_fields.remove("messages").is_some() {
            tracing::warn!("ignoring custom field `messages`; it would replace the conversation");
        }
        Self {
            messages,
            custom_fields,
        }
    }
}
