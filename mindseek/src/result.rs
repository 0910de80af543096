//! The normalized generation result envelope.

use serde::{Deserialize, Serialize};

use crate::audio::{SpeechAudio, Transcript};
use crate::capability::Capability;
use crate::chat::ChatMessage;
use crate::image::StoredImage;

/// A normalized generation result, tagged by payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum GenerationResult {
    /// A chat message, partial or terminal.
    Chat(ChatMessage),
    /// A normalized transcription.
    Transcript(Transcript),
    /// Synthesized speech audio.
    Speech(SpeechAudio),
    /// A stored, hosted image.
    Image(StoredImage),
}

impl GenerationResult {
    /// The capability that produced this result.
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::Chat(_) => Capability::Chat,
            Self::Transcript(_) => Capability::SpeechToText,
            Self::Speech(_) => Capability::TextToSpeech,
            Self::Image(_) => Capability::TextToImage,
        }
    }

    /// Whether this result ends its request.
    ///
    /// Only chat results can be non-terminal, while their `streaming`
    /// flag is still set.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        match self {
            Self::Chat(msg) => msg.is_terminal(),
            _ => true,
        }
    }

    /// Get the chat message if this is a chat result.
    #[must_use]
    pub const fn as_chat(&self) -> Option<&ChatMessage> {
        match self {
            Self::Chat(msg) => Some(msg),
            _ => None,
        }
    }

    /// Get the transcript if this is a transcription result.
    #[must_use]
    pub const fn as_transcript(&self) -> Option<&Transcript> {
        match self {
            Self::Transcript(transcript) => Some(transcript),
            _ => None,
        }
    }

    /// Get the audio if this is a speech result.
    #[must_use]
    pub const fn as_speech(&self) -> Option<&SpeechAudio> {
        match self {
            Self::Speech(audio) => Some(audio),
            _ => None,
        }
    }

    /// Get the stored image if this is an image result.
    #[must_use]
    pub const fn as_image(&self) -> Option<&StoredImage> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Short description of the result for history entries.
    ///
    /// Audio bytes are summarized by their MIME type; they are not
    /// replayable from history.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Chat(msg) => msg.content.clone(),
            Self::Transcript(transcript) => transcript.text.clone(),
            Self::Speech(audio) => audio.mime_type.clone(),
            Self::Image(image) => image.image_url.clone(),
        }
    }
}

impl From<ChatMessage> for GenerationResult {
    fn from(msg: ChatMessage) -> Self {
        Self::Chat(msg)
    }
}

impl From<Transcript> for GenerationResult {
    fn from(transcript: Transcript) -> Self {
        Self::Transcript(transcript)
    }
}

impl From<SpeechAudio> for GenerationResult {
    fn from(audio: SpeechAudio) -> Self {
        Self::Speech(audio)
    }
}

impl From<StoredImage> for GenerationResult {
    fn from(image: StoredImage) -> Self {
        Self::Image(image)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn transcript() -> Transcript {
        Transcript {
            text: "hello there".into(),
            language_code: "en".into(),
            language_confidence: 0.97,
            words: Vec::new(),
        }
    }

    #[test]
    fn capability_follows_variant() {
        let result = GenerationResult::Transcript(transcript());
        assert_eq!(result.capability(), Capability::SpeechToText);

        let result = GenerationResult::Image(StoredImage {
            image_url: "https://res.cloudinary.com/demo/flux-1.png".into(),
            image_id: "flux-1".into(),
        });
        assert_eq!(result.capability(), Capability::TextToImage);
    }

    #[test]
    fn partial_chat_is_not_terminal() {
        let result = GenerationResult::Chat(ChatMessage::partial("Hel"));
        assert!(!result.is_terminal());

        let result = GenerationResult::Chat(ChatMessage::assistant("Hello, world"));
        assert!(result.is_terminal());
    }

    #[test]
    fn non_chat_results_are_terminal() {
        let result = GenerationResult::Speech(SpeechAudio::new(vec![1], "audio/mpeg"));
        assert!(result.is_terminal());
    }

    #[test]
    fn accessors_match_variant() {
        let result = GenerationResult::Transcript(transcript());
        assert!(result.as_transcript().is_some());
        assert!(result.as_chat().is_none());
        assert!(result.as_speech().is_none());
        assert!(result.as_image().is_none());
    }

    #[test]
    fn serializes_with_type_tag() {
        let result = GenerationResult::Chat(ChatMessage::assistant("hi"));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "chat");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["streaming"], false);
    }

    #[test]
    fn summary_is_capability_specific() {
        assert_eq!(
            GenerationResult::Transcript(transcript()).summary(),
            "hello there"
        );
        assert_eq!(
            GenerationResult::Speech(SpeechAudio::new(vec![1], "audio/mpeg")).summary(),
            "audio/mpeg"
        );
    }
}
