//! DeepSeek client configuration.

use crate::credentials::{self, CredentialSource, EnvCredentials};
use crate::error::Result;

/// Configuration for the DeepSeek client.
#[derive(Debug, Clone)]
pub struct DeepSeekConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Default model to use.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl DeepSeekConfig {
    /// Default base URL for the DeepSeek API.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.deepseek.com/v1";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "deepseek-chat";

    /// Credential name holding the API key.
    pub const ENV_API_KEY: &'static str = "DEEPSEEK_API_KEY";

    /// Create a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            timeout_secs: Some(120),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `DEEPSEEK_API_KEY` (required)
    /// - `DEEPSEEK_BASE_URL` (optional)
    /// - `DEEPSEEK_MODEL` (optional)
    ///
    /// # Errors
    ///
    /// Returns an error if `DEEPSEEK_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvCredentials::new())
    }

    /// Create configuration from a credential source.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing from the source.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        let api_key = credentials::require(source, Self::ENV_API_KEY)?;

        let base_url = source
            .get("DEEPSEEK_BASE_URL")
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());

        let model = source
            .get("DEEPSEEK_MODEL")
            .unwrap_or_else(|| Self::DEFAULT_MODEL.to_owned());

        Ok(Self {
            api_key,
            base_url,
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

    /// Set the default model.
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

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}
