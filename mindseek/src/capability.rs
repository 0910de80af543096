//! Generation capabilities and the request envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::audio::TranscriptionRequest;

/// The generation capabilities covered by the pipelines.
///
/// The serialized names double as the per-capability history keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Streaming text chat.
    #[serde(rename = "chat")]
    Chat,
    /// Speech-to-text transcription.
    #[serde(rename = "stt")]
    SpeechToText,
    /// Text-to-speech synthesis.
    #[serde(rename = "tts")]
    TextToSpeech,
    /// Text-to-image generation with hosted storage.
    #[serde(rename = "tti")]
    TextToImage,
}

impl Capability {
    /// Get the short capability name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::SpeechToText => "stt",
            Self::TextToSpeech => "tts",
            Self::TextToImage => "tti",
        }
    }

    /// Parse a capability from its short name (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chat" => Some(Self::Chat),
            "stt" => Some(Self::SpeechToText),
            "tts" => Some(Self::TextToSpeech),
            "tti" => Some(Self::TextToImage),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Input payload attached to a generation request.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum Payload {
    /// A text prompt.
    Text(String),
    /// A recorded audio blob with its format.
    Audio(TranscriptionRequest),
}

/// An immutable request for a single generation.
///
/// Construct with the capability-specific constructors; fields are not
/// mutable after construction.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    capability: Capability,
    payload: Payload,
}

impl GenerationRequest {
    /// Create a chat request from a user prompt.
    #[must_use]
    pub fn chat(text: impl Into<String>) -> Self {
        Self {
            capability: Capability::Chat,
            payload: Payload::Text(text.into()),
        }
    }

    /// Create a transcription request from recorded audio.
    #[must_use]
    pub const fn transcription(audio: TranscriptionRequest) -> Self {
        Self {
            capability: Capability::SpeechToText,
            payload: Payload::Audio(audio),
        }
    }

    /// Create a speech synthesis request from text.
    #[must_use]
    pub fn speech(text: impl Into<String>) -> Self {
        Self {
            capability: Capability::TextToSpeech,
            payload: Payload::Text(text.into()),
        }
    }

    /// Create an image generation request from a prompt.
    #[must_use]
    pub fn image(prompt: impl Into<String>) -> Self {
        Self {
            capability: Capability::TextToImage,
            payload: Payload::Text(prompt.into()),
        }
    }

    /// The capability this request targets.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        self.capability
    }

    /// The request payload.
    #[must_use]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Consume the request, returning its payload.
    #[must_use]
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// The text payload, if this is a text request.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(text) => Some(text),
            Payload::Audio(_) => None,
        }
    }

    /// The audio payload, if this is an audio request.
    #[must_use]
    pub const fn audio(&self) -> Option<&TranscriptionRequest> {
        match &self.payload {
            Payload::Audio(audio) => Some(audio),
            Payload::Text(_) => None,
        }
    }

    /// Whether the payload is absent for validation purposes.
    ///
    /// Text payloads count as empty when blank after trimming.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.payload {
            Payload::Text(text) => text.trim().is_empty(),
            Payload::Audio(audio) => audio.audio.is_empty(),
        }
    }

    /// Short description of the request for history entries.
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.payload {
            Payload::Text(text) => text.clone(),
            Payload::Audio(audio) => audio.summary(),
        }
    }
}
