//! ElevenLabs API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::credentials::CredentialSource;
use crate::error::{PipelineError, Result};

use super::config::ElevenLabsConfig;

/// ElevenLabs error response.
#[derive(Debug, Clone, Deserialize)]
struct ElevenLabsErrorResponse {
    pub detail: ElevenLabsErrorDetail,
}

/// ElevenLabs error detail, either a plain string or a structured object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ElevenLabsErrorDetail {
    Structured { message: String },
    Text(String),
}

/// ElevenLabs API client.
#[derive(Debug, Clone)]
pub struct ElevenLabs {
    pub(crate) config: Arc<ElevenLabsConfig>,
    pub(crate) client: Client,
}

impl ElevenLabs {
    /// Create a new ElevenLabs client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot be built.
    pub fn new(config: ElevenLabsConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(PipelineError::config("ElevenLabs API key is required").into());
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
    /// Returns an error if `ELEVENLABS_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(ElevenLabsConfig::from_env()?)
    }

    /// Create a client reading credentials from the given source.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing from the source.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        Self::new(ElevenLabsConfig::from_source(source)?)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Get the synthesis voice.
    #[must_use]
    pub fn voice_id(&self) -> &str {
        &self.config.voice_id
    }

    /// Build the speech-to-text URL.
    pub(crate) fn stt_url(&self) -> String {
        format!("{}/speech-to-text", self.config.base_url)
    }

    /// Build the text-to-speech URL for the configured voice.
    pub(crate) fn tts_url(&self) -> String {
        format!(
            "{}/text-to-speech/{}",
            self.config.base_url, self.config.voice_id
        )
    }

    /// Build request headers for JSON requests.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("xi-api-key", &self.config.api_key)
            .header("Content-Type", "application/json")
    }

    /// Build request headers for multipart requests.
    pub(crate) fn build_multipart_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url).header("xi-api-key", &self.config.api_key)
    }

    /// Parse an error response from ElevenLabs.
    pub(crate) fn parse_error(status: u16, body: &str) -> PipelineError {
        if let Ok(response) = serde_json::from_str::<ElevenLabsErrorResponse>(body) {
            let message = match response.detail {
                ElevenLabsErrorDetail::Structured { message } => message,
                ElevenLabsErrorDetail::Text(text) => text,
            };
            return PipelineError::provider("elevenlabs", message);
        }

        PipelineError::provider_status("elevenlabs", status, body)
    }
}
