//! Mock provider implementations for testing.
//!
//! This module provides scripted fakes for every provider trait, useful
//! for exercising pipelines without real API calls. Each mock counts its
//! invocations so tests can assert which stages ran.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::audio::{
    RawTranscription, SpeechAudio, SpeechToTextProvider, TextToSpeechProvider,
    TranscriptionRequest,
};
use crate::chat::{ChatProvider, ChatRequest};
use crate::error::{PipelineError, Result};
use crate::image::{
    GeneratedImage, ImageGenerationProvider, ImageMetadata, ImageStorageProvider, RawUpload,
};
use crate::stream::{ChunkStream, StreamChunk};

/// A scripted chat provider.
///
/// Streams the configured text chunks followed by a done marker. Can be
/// set to fail before the stream opens or partway through it.
#[derive(Debug, Default)]
pub struct MockChatProvider {
    chunks: Vec<String>,
    fail_before_stream: bool,
    fail_mid_stream: bool,
    calls: AtomicUsize,
}

impl MockChatProvider {
    /// Create a provider that streams the given chunks.
    #[must_use]
    pub fn with_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Create a provider that fails before producing any chunk.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_before_stream: true,
            ..Default::default()
        }
    }

    /// Create a provider that streams the given chunks, then fails
    /// instead of finishing.
    #[must_use]
    pub fn failing_after_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            fail_mid_stream: true,
            ..Default::default()
        }
    }

    /// Number of times a stream was requested.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn chat_stream(&self, _request: &ChatRequest) -> Result<ChunkStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_before_stream {
            return Err(PipelineError::provider("mock", "chat backend unavailable").into());
        }

        let mut items: Vec<Result<StreamChunk>> = self
            .chunks
            .iter()
            .map(|chunk| Ok(StreamChunk::text(chunk)))
            .collect();

        if self.fail_mid_stream {
            items.push(Err(PipelineError::network("connection reset").into()));
        } else {
            items.push(Ok(StreamChunk::done()));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A canned speech-to-text provider.
#[derive(Debug)]
pub struct MockSpeechToText {
    transcription: RawTranscription,
    fail: bool,
    calls: AtomicUsize,
}

impl MockSpeechToText {
    /// Create a provider returning the given raw transcription.
    #[must_use]
    pub fn returning(transcription: RawTranscription) -> Self {
        Self {
            transcription,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider that fails every call.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            transcription: RawTranscription::default(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of transcription calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechToTextProvider for MockSpeechToText {
    async fn transcribe(&self, _request: &TranscriptionRequest) -> Result<RawTranscription> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(
                PipelineError::provider("mock", "transcription backend unavailable").into(),
            );
        }

        Ok(self.transcription.clone())
    }
}

/// A canned text-to-speech provider.
#[derive(Debug)]
pub struct MockTextToSpeech {
    audio: SpeechAudio,
    fail: bool,
    calls: AtomicUsize,
}

impl MockTextToSpeech {
    /// Create a provider returning the given audio.
    #[must_use]
    pub fn returning(audio: SpeechAudio) -> Self {
        Self {
            audio,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider that fails every call.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            audio: SpeechAudio::new(Vec::new(), "audio/mpeg"),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of synthesis calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextToSpeechProvider for MockTextToSpeech {
    async fn synthesize(&self, _text: &str) -> Result<SpeechAudio> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(PipelineError::provider("mock", "synthesis backend unavailable").into());
        }

        Ok(self.audio.clone())
    }
}

/// A canned image generation provider.
#[derive(Debug)]
pub struct MockImageGenerator {
    bytes: Vec<u8>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockImageGenerator {
    /// Create a provider returning a PNG with the given bytes.
    #[must_use]
    pub fn returning(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a provider that fails every call.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            bytes: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generation calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageGenerationProvider for MockImageGenerator {
    async fn generate(&self, _prompt: &str) -> Result<GeneratedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(PipelineError::provider("mock", "image backend unavailable").into());
        }

        Ok(GeneratedImage::png(self.bytes.clone()))
    }

    fn model_name(&self) -> String {
        "mock-model".to_owned()
    }
}

/// A canned image storage provider.
///
/// Keeps the metadata of the most recent upload so tests can assert what
/// the pipeline attached to it.
#[derive(Debug)]
pub struct MockImageStorage {
    upload: RawUpload,
    fail: bool,
    calls: AtomicUsize,
    last_metadata: Mutex<Option<ImageMetadata>>,
}

impl MockImageStorage {
    /// Create a provider returning the given URL and public id.
    #[must_use]
    pub fn returning(secure_url: impl Into<String>, public_id: impl Into<String>) -> Self {
        Self {
            upload: RawUpload {
                secure_url: Some(secure_url.into()),
                public_id: Some(public_id.into()),
            },
            fail: false,
            calls: AtomicUsize::new(0),
            last_metadata: Mutex::new(None),
        }
    }

    /// Create a provider that fails every call.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            upload: RawUpload::default(),
            fail: true,
            calls: AtomicUsize::new(0),
            last_metadata: Mutex::new(None),
        }
    }

    /// Number of upload calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Metadata attached to the most recent upload call.
    #[must_use]
    pub fn last_metadata(&self) -> Option<ImageMetadata> {
        self.last_metadata
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ImageStorageProvider for MockImageStorage {
    async fn upload(&self, _image: &GeneratedImage, metadata: &ImageMetadata) -> Result<RawUpload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_metadata.lock() {
            *guard = Some(metadata.clone());
        }

        if self.fail {
            return Err(PipelineError::storage("mock", "upload rejected").into());
        }

        Ok(self.upload.clone())
    }
}
