//! Audio types and provider traits for transcription and speech synthesis.
//!
//! Transcription adapters return the raw provider response
//! ([`RawTranscription`]); the normalizer converts it into the
//! sentinel-filled [`Transcript`] surfaced to callers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Supported audio container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// MP3 audio.
    Mp3,
    /// WAV audio.
    Wav,
    /// WebM audio, the usual browser-recorder container.
    Webm,
    /// Ogg audio.
    Ogg,
    /// FLAC audio.
    Flac,
    /// M4A (MP4 audio).
    M4a,
}

impl AudioFormat {
    /// Get the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::M4a => "m4a",
        }
    }

    /// Get the MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::M4a => "audio/mp4",
        }
    }

    /// Parse a format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "webm" => Some(Self::Webm),
            "ogg" => Some(Self::Ogg),
            "flac" => Some(Self::Flac),
            "m4a" | "mp4" => Some(Self::M4a),
            _ => None,
        }
    }
}

/// A recorded audio blob to transcribe.
#[derive(Debug, Clone)]
pub struct TranscriptionRequest {
    /// Raw audio bytes.
    pub audio: Vec<u8>,
    /// Container format of the audio.
    pub format: AudioFormat,
    /// Original file name, when one is known.
    pub file_name: Option<String>,
}

impl TranscriptionRequest {
    /// Create a transcription request.
    #[must_use]
    pub const fn new(audio: Vec<u8>, format: AudioFormat) -> Self {
        Self {
            audio,
            format,
            file_name: None,
        }
    }

    /// Set the original file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// File name to attach to uploads, derived from the format when unset.
    #[must_use]
    pub fn upload_file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| format!("audio.{}", self.format.extension()))
    }

    /// Short description of the audio for history entries.
    #[must_use]
    pub fn summary(&self) -> String {
        self.upload_file_name()
    }
}

/// Raw transcription response as a provider returns it.
///
/// Every field is optional; missing fields are filled with sentinels by
/// the normalizer, never here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTranscription {
    /// Transcribed text.
    pub text: Option<String>,
    /// Detected language code.
    pub language_code: Option<String>,
    /// Confidence of the language detection, `0.0..=1.0`.
    pub language_probability: Option<f64>,
    /// Word-level timing entries, in utterance order.
    pub words: Option<Vec<RawTranscriptionWord>>,
}

/// A single word entry of a raw transcription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTranscriptionWord {
    /// The word text.
    pub text: Option<String>,
    /// Start offset in seconds.
    pub start: Option<f64>,
    /// End offset in seconds.
    pub end: Option<f64>,
    /// Speaker label when diarization is enabled.
    pub speaker_id: Option<String>,
}

/// A normalized transcription result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Transcribed text.
    pub text: String,
    /// Detected language code, `"Unknown"` when not reported.
    pub language_code: String,
    /// Language detection confidence, `0.0` when not reported.
    pub language_confidence: f64,
    /// Word-level timing entries, in utterance order.
    pub words: Vec<TranscriptWord>,
}

/// A word with timing in a normalized transcription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    /// The word text.
    pub text: String,
    /// Start offset in seconds.
    pub start: f64,
    /// End offset in seconds.
    pub end: f64,
    /// Speaker label when diarization reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,
}

/// Synthesized speech audio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechAudio {
    /// Raw audio bytes.
    pub audio: Vec<u8>,
    /// MIME type of the audio.
    pub mime_type: String,
}

impl SpeechAudio {
    /// Create a speech audio result.
    #[must_use]
    pub fn new(audio: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            audio,
            mime_type: mime_type.into(),
        }
    }

    /// Save the audio to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.audio)
    }
}

/// A provider that transcribes recorded audio.
#[async_trait]
pub trait SpeechToTextProvider: Send + Sync {
    /// Transcribe an audio blob.
    ///
    /// # Arguments
    ///
    /// * `request` - The audio to transcribe
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request or cannot be
    /// reached.
    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<RawTranscription>;
}

/// A provider that synthesizes speech from text.
#[async_trait]
pub trait TextToSpeechProvider: Send + Sync {
    /// Synthesize speech from text.
    ///
    /// # Arguments
    ///
    /// * `text` - The text to speak
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request or cannot be
    /// reached.
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio>;

    /// Synthesize speech and save it to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if synthesis fails or the file cannot be written.
    async fn synthesize_to_file(
        &self,
        text: &str,
        path: impl AsRef<std::path::Path> + Send,
    ) -> Result<SpeechAudio>
    where
        Self: Sized,
    {
        let response = self.synthesize(text).await?;
        response.save(path)?;
        Ok(response)
    }
}

/// Shared reference to a speech-to-text provider.
pub type SharedSpeechToTextProvider = std::sync::Arc<dyn SpeechToTextProvider>;

/// Shared reference to a text-to-speech provider.
pub type SharedTextToSpeechProvider = std::sync::Arc<dyn TextToSpeechProvider>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod audio_format {
        use super::*;

        #[test]
        fn extension_and_mime_agree() {
            assert_eq!(AudioFormat::Mp3.extension(), "mp3");
            assert_eq!(AudioFormat::Mp3.mime_type(), "audio/mpeg");
            assert_eq!(AudioFormat::Webm.mime_type(), "audio/webm");
            assert_eq!(AudioFormat::M4a.mime_type(), "audio/mp4");
        }

        #[test]
        fn from_extension_round_trips() {
            for format in [
                AudioFormat::Mp3,
                AudioFormat::Wav,
                AudioFormat::Webm,
                AudioFormat::Ogg,
                AudioFormat::Flac,
                AudioFormat::M4a,
            ] {
                assert_eq!(AudioFormat::from_extension(format.extension()), Some(format));
            }
        }

        #[test]
        fn from_extension_is_case_insensitive() {
            assert_eq!(AudioFormat::from_extension("WAV"), Some(AudioFormat::Wav));
        }

        #[test]
        fn from_extension_rejects_unknown() {
            assert_eq!(AudioFormat::from_extension("txt"), None);
        }

        #[test]
        fn serializes_lowercase() {
            let json = serde_json::to_string(&AudioFormat::Webm).unwrap();
            assert_eq!(json, r#""webm""#);
        }
    }

    mod transcription_request {
        use super::*;

        #[test]
        fn upload_file_name_prefers_explicit_name() {
            let request = TranscriptionRequest::new(vec![0], AudioFormat::Webm)
                .with_file_name("recording.webm");
            assert_eq!(request.upload_file_name(), "recording.webm");
        }

        #[test]
        fn upload_file_name_falls_back_to_extension() {
            let request = TranscriptionRequest::new(vec![0], AudioFormat::Wav);
            assert_eq!(request.upload_file_name(), "audio.wav");
        }
    }

    mod raw_transcription {
        use super::*;

        #[test]
        fn deserializes_with_all_fields_missing() {
            let raw: RawTranscription = serde_json::from_str("{}").unwrap();
            assert!(raw.text.is_none());
            assert!(raw.language_code.is_none());
            assert!(raw.language_probability.is_none());
            assert!(raw.words.is_none());
        }

        #[test]
        fn deserializes_words_with_speakers() {
            let json = r#"{
                "text": "hello there",
                "language_code": "en",
                "language_probability": 0.97,
                "words": [
                    {"text": "hello", "start": 0.0, "end": 0.4, "speaker_id": "speaker_0"},
                    {"text": "there", "start": 0.5, "end": 0.9}
                ]
            }"#;
            let raw: RawTranscription = serde_json::from_str(json).unwrap();
            let words = raw.words.unwrap();
            assert_eq!(words.len(), 2);
            assert_eq!(words[0].speaker_id.as_deref(), Some("speaker_0"));
            assert!(words[1].speaker_id.is_none());
        }
    }

    mod speech_audio {
        use super::*;

        #[test]
        fn save_writes_bytes() {
            let audio = SpeechAudio::new(vec![1, 2, 3], "audio/mpeg");
            let path = std::env::temp_dir().join("mindseek_speech_audio_test.mp3");
            audio.save(&path).unwrap();
            assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
            std::fs::remove_file(&path).unwrap();
        }
    }
}
