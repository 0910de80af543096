//! DeepSeek API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::ChatRequest;
use crate::credentials::CredentialSource;
use crate::error::{PipelineError, Result};

use super::config::DeepSeekConfig;

/// DeepSeek chat completion request.
///
/// DeepSeek follows the OpenAI chat-completions wire format.
#[derive(Debug, Clone, Serialize)]
pub struct DeepSeekChatRequest {
    pub model: String,
    pub messages: Vec<DeepSeekMessage>,
    pub stream: bool,
}

/// DeepSeek message format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekMessage {
    pub role: String,
    pub content: String,
}

/// DeepSeek error response.
#[derive(Debug, Clone, Deserialize)]
struct DeepSeekErrorResponse {
    pub error: DeepSeekError,
}

/// DeepSeek error details.
#[derive(Debug, Clone, Deserialize)]
struct DeepSeekError {
    pub message: String,
}

/// DeepSeek API client.
#[derive(Debug, Clone)]
pub struct DeepSeek {
    pub(crate) config: Arc<DeepSeekConfig>,
    pub(crate) client: Client,
}

impl DeepSeek {
    /// Create a new DeepSeek client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn new(config: DeepSeekConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PipelineError::config("DeepSeek API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| PipelineError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `DEEPSEEK_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(DeepSeekConfig::from_env()?)
    }

    /// Create a client reading credentials from the given source.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing from the source.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        Self::new(DeepSeekConfig::from_source(source)?)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the default model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the chat completions URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// Build request headers for JSON requests.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
    }

    /// Build the request body for a streaming completion.
    pub(crate) fn build_body(&self, request: &ChatRequest) -> DeepSeekChatRequest {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.model.clone());

        DeepSeekChatRequest {
            model,
            messages: vec![DeepSeekMessage {
                role: "user".to_owned(),
                content: request.text.clone(),
            }],
            stream: true,
        }
    }

    /// Parse an error response from DeepSeek.
    pub(crate) fn parse_error(status: u16, body: &str) -> PipelineError {
        if let Ok(response) = serde_json::from_str::<DeepSeekErrorResponse>(body) {
            return PipelineError::provider("deepseek", response.error.message);
        }

        PipelineError::provider_status("deepseek", status, body)
    }
}
