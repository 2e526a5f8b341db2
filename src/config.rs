//! Connection settings for the DIAL gateway.

use reqwest::Url;
use thiserror::Error;

/// Gateway URL used when `DIAL_URL` is not set.
pub const DEFAULT_DIAL_URL: &str = "https://ai-proxy.lab.epam.com";
/// Chat-completions route relative to the gateway URL. `{model}` is replaced
/// with the deployment name.
pub const CHAT_COMPLETIONS_PATH: &str = "/openai/deployments/{model}/chat/completions";
/// Header carrying the gateway API key.
pub const API_KEY_HEADER: &str = "Api-Key";
/// Placeholder substituted with the deployment name.
pub const MODEL_PLACEHOLDER: &str = "{model}";

const API_KEY_VAR: &str = "DIAL_API_KEY";
const URL_VAR: &str = "DIAL_URL";

/// Errors raised while building a client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Environment variable not found: {0}")]
    MissingVar(&'static str),
    /// A required value is empty.
    #[error("`{0}` must not be empty")]
    EmptyValue(&'static str),
    /// A URL value could not be used.
    #[error("Invalid {field} `{value}`: {reason}")]
    InvalidUrl {
        /// Which setting was invalid
        field: &'static str,
        /// The rejected value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Credentials and gateway location shared by the clients.
#[derive(Clone)]
pub struct DialConfig {
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for DialConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl DialConfig {
    /// Creates a configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty or the URL is not an absolute http(s) URL.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = non_empty(api_key.into(), "api_key")?;
        let base_url = non_empty(base_url.into(), "base_url")?;
        validate_url("base_url", &base_url)?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Creates a configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// * `DIAL_API_KEY` - The API key for authentication
    /// * `DIAL_URL` - The gateway URL (optional)
    ///
    /// # Errors
    ///
    /// Returns an error if `DIAL_API_KEY` is not set or either value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| ConfigError::MissingVar(API_KEY_VAR))?;
        let base_url = std::env::var(URL_VAR).unwrap_or_else(|_| DEFAULT_DIAL_URL.to_string());
        Self::new(api_key, base_url)
    }

    /// The API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The gateway URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The chat-completions endpoint template, containing the `{model}` placeholder.
    pub fn chat_completions_endpoint(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }
}

pub(crate) fn non_empty(value: String, field: &'static str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::EmptyValue(field))
    } else {
        Ok(value)
    }
}

pub(crate) fn validate_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{}`", other))),
    }
}
