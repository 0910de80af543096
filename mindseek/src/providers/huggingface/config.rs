//! Hugging Face client configuration.

use crate::credentials::{self, CredentialSource, EnvCredentials};
use crate::error::Result;

/// Configuration for the Hugging Face inference router client.
#[derive(Debug, Clone)]
pub struct HuggingFaceConfig {
    /// Access token for authentication.
    pub token: String,
    /// Base URL of the inference router.
    pub base_url: String,
    /// Inference provider routed to.
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl HuggingFaceConfig {
    /// Default base URL for the inference router.
    pub const DEFAULT_BASE_URL: &'static str = "https://router.huggingface.co";

    /// Default inference provider.
    pub const DEFAULT_PROVIDER: &'static str = "fal-ai";

    /// Default image model.
    pub const DEFAULT_MODEL: &'static str = "black-forest-labs/FLUX.1-dev";

    /// Credential name holding the access token.
    pub const ENV_TOKEN: &'static str = "HF_TOKEN";

    /// Create a new configuration with the given access token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            provider: Self::DEFAULT_PROVIDER.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: Some(120),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `HF_TOKEN` (required)
    /// - `HF_BASE_URL` (optional)
    /// - `HF_MODEL` (optional)
    ///
    /// # Errors
    ///
    /// Returns an error if `HF_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvCredentials::new())
    }

    /// Create configuration from a credential source.
    ///
    /// # Errors
    ///
    /// Returns an error if the access token is missing from the source.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        let token = credentials::require(source, Self::ENV_TOKEN)?;

        let base_url = source
            .get("HF_BASE_URL")
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());

        let model = source
            .get("HF_MODEL")
            .unwrap_or_else(|| Self::DEFAULT_MODEL.to_owned());

        Ok(Self {
            token,
            base_url,
            provider: Self::DEFAULT_PROVIDER.to_owned(),
            model,
            timeout_secs: Some(120),
        })
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the inference provider.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}
