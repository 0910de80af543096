//! Hugging Face inference router client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::credentials::CredentialSource;
use crate::error::{PipelineError, Result};

use super::config::HuggingFaceConfig;

/// Hugging Face error response.
#[derive(Debug, Clone, Deserialize)]
struct HuggingFaceErrorResponse {
    pub error: String,
}

/// Hugging Face inference router client.
#[derive(Debug, Clone)]
pub struct HuggingFace {
    pub(crate) config: Arc<HuggingFaceConfig>,
    pub(crate) client: Client,
}

impl HuggingFace {
    /// Create a new Hugging Face client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the HTTP client cannot be built.
    pub fn new(config: HuggingFaceConfig) -> Result<Self> {
        if config.token.is_empty() {
            return Err(PipelineError::config("Hugging Face token is required").into());
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
    /// Returns an error if `HF_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(HuggingFaceConfig::from_env()?)
    }

    /// Create a client reading credentials from the given source.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is missing from the source.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        Self::new(HuggingFaceConfig::from_source(source)?)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Build the routed model inference URL.
    pub(crate) fn model_url(&self) -> String {
        format!(
            "{}/{}/models/{}",
            self.config.base_url, self.config.provider, self.config.model
        )
    }

    /// Build request headers for JSON requests.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.config.token))
            .header("Content-Type", "application/json")
    }

    /// Parse an error response from the inference router.
    pub(crate) fn parse_error(status: u16, body: &str) -> PipelineError {
        if let Ok(response) = serde_json::from_str::<HuggingFaceErrorResponse>(body) {
            return PipelineError::provider("huggingface", response.error);
        }

        PipelineError::provider_status("huggingface", status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_rejects_empty_token() {
        let result = HuggingFace::new(HuggingFaceConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_model_url() {
        let client = HuggingFace::new(HuggingFaceConfig::new("hf_test")).expect("client builds");
        assert_eq!(
            client.model_url(),
            "https://router.huggingface.co/fal-ai/models/black-forest-labs/FLUX.1-dev"
        );
    }

    #[test]
    fn test_parse_error_typed() {
        let err = HuggingFace::parse_error(503, r#"{"error":"Model is overloaded"}"#);
        assert_eq!(err.kind, ErrorKind::Provider);
        assert_eq!(err.message, "Model is overloaded");
    }

    #[test]
    fn test_parse_error_fallback() {
        let err = HuggingFace::parse_error(500, "upstream timeout");
        assert_eq!(err.status, Some(500));
        assert!(err.message.contains("upstream timeout"));
    }
}
