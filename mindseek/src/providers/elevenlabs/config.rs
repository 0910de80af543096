//! ElevenLabs client configuration.

use crate::credentials::{self, CredentialSource, EnvCredentials};
use crate::error::Result;

/// Configuration for the ElevenLabs client.
///
/// A single API key covers both speech-to-text and text-to-speech.
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    /// API key for authentication.
    pub api_key: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Transcription model to use.
    pub stt_model: String,
    /// Speech synthesis model to use.
    pub tts_model: String,
    /// Voice used for speech synthesis.
    pub voice_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl ElevenLabsConfig {
    /// Default base URL for the ElevenLabs API.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.elevenlabs.io/v1";

    /// Default transcription model.
    pub const DEFAULT_STT_MODEL: &'static str = "scribe_v1";

    /// Default speech synthesis model.
    pub const DEFAULT_TTS_MODEL: &'static str = "eleven_multilingual_v2";

    /// Default voice (George).
    pub const DEFAULT_VOICE_ID: &'static str = "JBFqnCBsd6RMkjVDRZzb";

    /// Credential name holding the API key.
    pub const ENV_API_KEY: &'static str = "ELEVENLABS_API_KEY";

    /// Create a new configuration with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            stt_model: Self::DEFAULT_STT_MODEL.to_owned(),
            tts_model: Self::DEFAULT_TTS_MODEL.to_owned(),
            voice_id: Self::DEFAULT_VOICE_ID.to_owned(),
            timeout_secs: Some(120),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `ELEVENLABS_API_KEY` (required)
    /// - `ELEVENLABS_BASE_URL` (optional)
    /// - `ELEVENLABS_VOICE_ID` (optional)
    ///
    /// # Errors
    ///
    /// Returns an error if `ELEVENLABS_API_KEY` is not set.
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
            .get("ELEVENLABS_BASE_URL")
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_owned());

        let voice_id = source
            .get("ELEVENLABS_VOICE_ID")
            .unwrap_or_else(|| Self::DEFAULT_VOICE_ID.to_owned());

        Ok(Self {
            api_key,
            base_url,
            stt_model: Self::DEFAULT_STT_MODEL.to_owned(),
            tts_model: Self::DEFAULT_TTS_MODEL.to_owned(),
            voice_id,
            timeout_secs: Some(120),
        })
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the transcription model.
    #[must_use]
    pub fn with_stt_model(mut self, model: impl Into<String>) -> Self {
        self.stt_model = model.into();
        self
    }

    /// Set the speech synthesis model.
    #[must_use]
    pub fn with_tts_model(mut self, model: impl Into<String>) -> Self {
        self.tts_model = model.into();
        self
    }

    /// Set the synthesis voice.
    #[must_use]
    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}
