//! Error types for the DIAL client.

use thiserror::Error;

use crate::bucket::StorageError;
use crate::config::ConfigError;

/// Errors that can occur when using the DIAL client.
#[derive(Debug, Error)]
pub enum DialError {
    /// Missing or invalid credentials or endpoint.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Bucket upload or download failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The gateway answered with a non-success status.
    #[error("Gateway returned {status}: {body}")]
    Gateway {
        /// HTTP status code
        status: u16,
        /// Error body as returned by the gateway
        body: String,
    },

    /// The gateway response did not have the expected shape.
    #[error("Unexpected response shape: {0}")]
    Protocol(String),

    /// The request cannot be sent as given.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request failed before any HTTP status was received.
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// An attachment with neither `url` nor `data` cannot be resolved.
    #[error(
        "Attachment {} has neither a url nor inline data",
        .title.as_deref().unwrap_or("<untitled>")
    )]
    EmptyAttachment {
        /// Title of the offending attachment
        title: Option<String>,
    },

    /// Inline attachment data is not valid base64.
    #[error("Invalid inline attachment data: {0}")]
    Decode(#[from] base64::DecodeError),
}
