//! Structured content parts used by multimodal messages.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::data_url;

/// One element of a multimodal message body.
///
/// The variant is carried on the wire by the `type` field (`"text"` or
/// `"image_url"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A plain text fragment.
    Text {
        /// The text content of the part
        text: String,
    },
    /// An image addressed by an `http(s)` link or a `data:` URI.
    ImageUrl {
        /// The image reference
        image_url: ImageUrl,
    },
}

/// Image reference carried by [`ContentPart::ImageUrl`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    /// Either an `http(s)://` link or a base64 `data:` URI.
    pub url: String,
    /// Optional fidelity hint for vision models.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<ImageDetail>,
}

/// Fidelity hint for image inputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDetail {
    /// Let the model decide.
    Auto,
    /// Low resolution, cheaper processing.
    Low,
    /// High resolution.
    High,
}

impl ContentPart {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Creates an image part from a URL or `data:` URI.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: None,
            },
        }
    }

    /// Creates an image part that inlines `bytes` as a base64 `data:` URI.
    pub fn image_base64(mime_type: &str, bytes: &[u8]) -> Self {
        Self::image_url(data_url::encode(mime_type, bytes))
    }

    /// Reads a local image and inlines it, guessing the MIME type from the extension.
    pub fn image_from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_guess::from_path(path).first_or_octet_stream();
        let bytes = std::fs::read(path)?;
        Ok(Self::image_base64(mime_type.essence_str(), &bytes))
    }

    /// Sets the detail hint on an image part. Text parts are returned unchanged.
    pub fn with_detail(mut self, detail: ImageDetail) -> Self {
        if let Self::ImageUrl { image_url } = &mut self {
            image_url.detail = Some(detail);
        }
        self
    }

    /// Returns the text if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::ImageUrl { .. } => None,
        }
    }

    /// Returns the image reference if this is an image part.
    pub fn as_image_url(&self) -> Option<&str> {
        match self {
            Self::Text { .. } => None,
            Self::ImageUrl { image_url } => Some(&image_url.url),
        }
    }
}
