//! Pure normalization of raw provider responses.
//!
//! Normalization never fails: missing or malformed fields degrade to the
//! sentinel values defined here. Chat and speech payloads arrive at the
//! pipeline already in their normalized shape; transcription and upload
//! responses are converted by the functions below.

use crate::audio::{RawTranscription, RawTranscriptionWord, Transcript, TranscriptWord};
use crate::image::{RawUpload, StoredImage};

/// Language code used when the provider reported none.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Transcript text used when the provider reported none.
pub const NO_TRANSCRIPT_TEXT: &str = "No transcription available";

/// Normalize a raw transcription response.
///
/// Missing text becomes [`NO_TRANSCRIPT_TEXT`], a missing language code
/// becomes [`UNKNOWN_LANGUAGE`], a missing confidence becomes `0.0`
/// (non-finite and out-of-range values are clamped into `0.0..=1.0`), and
/// missing words become an empty list. Feeding a normalized transcript
/// back through produces byte-identical output.
#[must_use]
pub fn normalize_transcription(raw: &RawTranscription) -> Transcript {
    let text = raw
        .text
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(NO_TRANSCRIPT_TEXT)
        .to_owned();
    let language_code = raw
        .language_code
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_LANGUAGE)
        .to_owned();
    let language_confidence = raw
        .language_probability
        .filter(|p| p.is_finite())
        .map_or(0.0, |p| p.clamp(0.0, 1.0));
    let words = raw
        .words
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(normalize_word)
        .collect();

    Transcript {
        text,
        language_code,
        language_confidence,
        words,
    }
}

fn normalize_word(raw: &RawTranscriptionWord) -> TranscriptWord {
    TranscriptWord {
        text: raw.text.clone().unwrap_or_default(),
        start: raw.start.filter(|s| s.is_finite()).unwrap_or(0.0),
        end: raw.end.filter(|e| e.is_finite()).unwrap_or(0.0),
        speaker_id: raw.speaker_id.clone(),
    }
}

/// Normalize a raw storage upload response.
///
/// Missing fields degrade to empty strings; a populated URL therefore
/// always came from a successful upload response.
#[must_use]
pub fn normalize_upload(raw: &RawUpload) -> StoredImage {
    StoredImage {
        image_url: raw.secure_url.clone().unwrap_or_default(),
        image_id: raw.public_id.clone().unwrap_or_default(),
    }
}

impl From<Transcript> for RawTranscription {
    fn from(transcript: Transcript) -> Self {
        Self {
            text: Some(transcript.text),
            language_code: Some(transcript.language_code),
            language_probability: Some(transcript.language_confidence),
            words: Some(
                transcript
                    .words
                    .into_iter()
                    .map(|word| RawTranscriptionWord {
                        text: Some(word.text),
                        start: Some(word.start),
                        end: Some(word.end),
                        speaker_id: word.speaker_id,
                    })
                    .collect(),
            ),
        }
    }
}

impl From<StoredImage> for RawUpload {
    fn from(image: StoredImage) -> Self {
        Self {
            secure_url: Some(image.image_url),
            public_id: Some(image.image_id),
        }
    }
}
