//! Chat-completion client for the DIAL gateway.

use reqwest::Url;

use crate::config::{self, ConfigError, DialConfig, API_KEY_HEADER, MODEL_PLACEHOLDER};
use crate::error::DialError;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, CustomFields, Message};

/// A client bound to one gateway deployment.
///
/// The client keeps no conversation state: every call sends the full history
/// it is given and returns one response.
#[derive(Clone)]
pub struct ModelClient {
    api_key: String,
    deployment_name: String,
    url: Url,
    client: reqwest::Client,
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("deployment_name", &self.deployment_name)
            .field("url", &self.url.as_str())
            .finish()
    }
}

impl ModelClient {
    /// Creates a new ModelClient.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The chat-completions URL. A `{model}` placeholder is
    ///   replaced with `deployment_name`; otherwise the URL is used as-is.
    /// * `deployment_name` - The deployment to route requests to (e.g. "gpt-4o")
    /// * `api_key` - The API key for authentication
    ///
    /// # Errors
    ///
    /// Returns an error if any value is empty or the endpoint is not an absolute http(s) URL.
    pub fn new(
        endpoint: impl AsRef<str>,
        deployment_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let deployment_name = config::non_empty(deployment_name.into(), "deployment_name")?;
        let api_key = config::non_empty(api_key.into(), "api_key")?;
        let endpoint = config::non_empty(endpoint.as_ref().to_string(), "endpoint")?;
        let url = config::validate_url(
            "endpoint",
            &endpoint.replace(MODEL_PLACEHOLDER, &deployment_name),
        )?;

        Ok(Self {
            api_key,
            deployment_name,
            url,
            client: reqwest::Client::new(),
        })
    }

    /// Creates a ModelClient for `deployment_name` from a shared configuration.
    pub fn from_config(
        config: &DialConfig,
        deployment_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::new(
            config.chat_completions_endpoint(),
            deployment_name,
            config.api_key(),
        )
    }

    /// The deployment this client talks to.
    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    /// The resolved chat-completions URL.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Sends the conversation and returns the first choice's message.
    ///
    /// Any further choices are discarded. Generated attachments, if any, are
    /// found in the returned message's `custom_content`.
    ///
    /// # Arguments
    ///
    /// * `messages` - The conversation so far, in order
    /// * `custom_fields` - Vendor-specific parameters merged into the request body
    ///
    /// # Errors
    ///
    /// Returns [`DialError::Gateway`] on a non-success status and
    /// [`DialError::Protocol`] if the response cannot be parsed or has no choices.
    pub async fn get_completion(
        &self,
        messages: &[Message],
        custom_fields: Option<CustomFields>,
    ) -> Result<Message, DialError> {
        self.create_completion(messages, custom_fields)
            .await?
            .into_first_message()
            .ok_or_else(|| DialError::Protocol("response contains no choices".into()))
    }

    /// Sends the conversation and returns the full parsed response.
    ///
    /// # Errors
    ///
    /// Same as [`get_completion`](Self::get_completion), except that an empty
    /// `choices` list is returned as-is.
    pub async fn create_completion(
        &self,
        messages: &[Message],
        custom_fields: Option<CustomFields>,
    ) -> Result<ChatCompletionResponse, DialError> {
        if messages.is_empty() {
            return Err(DialError::InvalidRequest(
                "a completion needs at least one message".into(),
            ));
        }
        let request = ChatCompletionRequest::new(messages.to_vec(), custom_fields);
        self.send_request(&request).await
    }

    async fn send_request(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, DialError> {
        tracing::debug!(
            deployment = %self.deployment_name,
            messages = request.messages.len(),
            custom_fields = request.custom_fields.len(),
            "sending chat completion"
        );

        let response = self
            .client
            .post(self.url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "chat completion failed");
            return Err(DialError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            DialError::Protocol(format!("Failed to parse response: {}. Response: {}", e, body))
        })?;
        tracing::debug!(
            choices = parsed.choices.len(),
            id = parsed.id.as_deref().unwrap_or_default(),
            "chat completion received"
        );
        Ok(parsed)
    }
}
