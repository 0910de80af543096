//! The generation pipeline orchestrator.
//!
//! [`Pipeline`] sequences each request through a fixed set of stages:
//! validate the input and adapter preconditions, call the capability's
//! provider (two chained calls for text-to-image), normalize the raw
//! response and record the outcome in history. A failure at any stage
//! short-circuits the rest; no stage is retried.
//!
//! Providers are resolved once, at construction. A capability whose
//! credentials were absent at that point stays unavailable and its
//! requests fail with a config error before any network call.
//!
//! # Example
//!
//! ```rust,ignore
//! use mindseek::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::from_env()?;
//! let image = pipeline.run_tti("a red fox in the snow").await?;
//! println!("{}", image.image_url);
//! ```

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;

use crate::audio::{
    SharedSpeechToTextProvider, SharedTextToSpeechProvider, SpeechAudio, Transcript,
    TranscriptionRequest,
};
use crate::capability::{Capability, GenerationRequest, Payload};
use crate::chat::{ChatMessage, ChatRequest, SharedChatProvider};
use crate::credentials::{CredentialSource, EnvCredentials};
use crate::error::{Error, PipelineError, Result};
use crate::history::{HistoryEntry, SharedHistoryStore, in_memory::InMemoryHistory};
use crate::image::{
    ImageMetadata, SharedImageGenerationProvider, SharedImageStorageProvider, StoredImage,
};
use crate::normalize;
use crate::providers::{
    Cloudinary, CloudinaryConfig, DeepSeek, DeepSeekConfig, ElevenLabs, ElevenLabsConfig,
    HuggingFace, HuggingFaceConfig,
};
use crate::result::GenerationResult;
use crate::stream::{MessageStream, STREAM_FAILURE_MESSAGE, reconcile};

/// File name of the debug copy written to the system temp directory
/// between image generation and upload. The write is best-effort and
/// never fails the request.
pub const DEBUG_IMAGE_FILE: &str = "debug_flux.png";

/// Stages a request moves through inside the orchestrator.
///
/// Every capability validates first and normalizes last; only
/// text-to-image passes through [`Stage::Storing`]. Completion and
/// failure are conveyed by the operation's `Result`, not by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Input and precondition checks, before any network call.
    Validating,
    /// The generation provider call.
    Generating,
    /// The storage upload call (text-to-image only).
    Storing,
    /// Conversion of the raw response into the result shape.
    Normalizing,
}

impl Stage {
    /// Get the stage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Generating => "generating",
            Self::Storing => "storing",
            Self::Normalizing => "normalizing",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The multi-modal generation pipeline.
///
/// One instance serves all four capabilities. Collaborators are shared
/// trait objects behind [`Arc`]s, so the pipeline holds no per-request
/// state and one instance can serve concurrent requests.
pub struct Pipeline {
    chat: Option<SharedChatProvider>,
    speech_to_text: Option<SharedSpeechToTextProvider>,
    text_to_speech: Option<SharedTextToSpeechProvider>,
    image_generation: Option<SharedImageGenerationProvider>,
    image_storage: Option<SharedImageStorageProvider>,
    history: SharedHistoryStore,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("has_chat", &self.chat.is_some())
            .field("has_speech_to_text", &self.speech_to_text.is_some())
            .field("has_text_to_speech", &self.text_to_speech.is_some())
            .field("has_image_generation", &self.image_generation.is_some())
            .field("has_image_storage", &self.image_storage.is_some())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Create a builder for assembling a pipeline from parts.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Build a pipeline from process environment variables.
    ///
    /// Each capability is wired only when its credentials are present;
    /// requests to the others fail with a config error. History is kept
    /// in memory; swap it with [`Self::with_history`].
    ///
    /// # Errors
    ///
    /// Returns an error if a provider client cannot be constructed.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvCredentials::new())
    }

    /// Build a pipeline, reading credentials from the given source.
    ///
    /// The source is consulted once; credentials added to it later are
    /// not picked up. ElevenLabs backs both speech capabilities with one
    /// shared client, and image storage requires all three Cloudinary
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider client cannot be constructed.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        let chat = if source.contains(DeepSeekConfig::ENV_API_KEY) {
            Some(Arc::new(DeepSeek::from_source(source)?) as SharedChatProvider)
        } else {
            None
        };

        let elevenlabs = if source.contains(ElevenLabsConfig::ENV_API_KEY) {
            Some(ElevenLabs::from_source(source)?)
        } else {
            None
        };
        let speech_to_text = elevenlabs
            .clone()
            .map(|client| Arc::new(client) as SharedSpeechToTextProvider);
        let text_to_speech =
            elevenlabs.map(|client| Arc::new(client) as SharedTextToSpeechProvider);

        let image_generation = if source.contains(HuggingFaceConfig::ENV_TOKEN) {
            Some(Arc::new(HuggingFace::from_source(source)?) as SharedImageGenerationProvider)
        } else {
            None
        };

        let storage_configured = source.contains(CloudinaryConfig::ENV_CLOUD_NAME)
            && source.contains(CloudinaryConfig::ENV_API_KEY)
            && source.contains(CloudinaryConfig::ENV_API_SECRET);
        let image_storage = if storage_configured {
            Some(Arc::new(Cloudinary::from_source(source)?) as SharedImageStorageProvider)
        } else {
            None
        };

        Ok(Self {
            chat,
            speech_to_text,
            text_to_speech,
            image_generation,
            image_storage,
            history: Arc::new(InMemoryHistory::new()),
        })
    }

    /// Replace the history store.
    #[must_use]
    pub fn with_history(mut self, history: SharedHistoryStore) -> Self {
        self.history = history;
        self
    }

    /// The history store recording outcomes for all four capabilities.
    #[must_use]
    pub const fn history(&self) -> &SharedHistoryStore {
        &self.history
    }

    /// Run a generation request to completion.
    ///
    /// Dispatches on the request's capability. Chat requests are drained
    /// to their terminal message; use [`Self::run_chat`] to observe
    /// partial messages as they arrive.
    ///
    /// # Errors
    ///
    /// Returns the originating stage's error unchanged.
    pub async fn run(&self, request: GenerationRequest) -> Result<GenerationResult> {
        match (request.capability(), request.into_payload()) {
            (Capability::Chat, Payload::Text(text)) => {
                let mut messages = self.run_chat(&text).await?;
                let mut terminal = ChatMessage::error(STREAM_FAILURE_MESSAGE);
                while let Some(message) = messages.next().await {
                    terminal = message;
                }
                Ok(GenerationResult::Chat(terminal))
            }
            (Capability::SpeechToText, Payload::Audio(audio)) => {
                Ok(GenerationResult::Transcript(self.run_stt(audio).await?))
            }
            (Capability::TextToSpeech, Payload::Text(text)) => {
                Ok(GenerationResult::Speech(self.run_tts(&text).await?))
            }
            (Capability::TextToImage, Payload::Text(text)) => {
                Ok(GenerationResult::Image(self.run_tti(&text).await?))
            }
            (capability, _) => Err(PipelineError::input(format!(
                "Unsupported payload for capability {capability}"
            ))
            .into()),
        }
    }

    /// Run a streaming chat generation.
    ///
    /// The returned stream emits one partial assistant message per
    /// received chunk with `streaming: true`, then exactly one terminal
    /// message with `streaming: false` whose content is appended to
    /// history. A failure after the stream opened surfaces as a terminal
    /// `error` role message instead of an `Err`. Dropping the stream
    /// cancels the request; nothing further is read or recorded.
    ///
    /// # Errors
    ///
    /// Returns an error for blank input, a missing DeepSeek credential,
    /// or a provider rejection before the stream opens.
    pub async fn run_chat(&self, text: &str) -> Result<MessageStream> {
        tracing::debug!(stage = %Stage::Validating, "chat request");
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(PipelineError::input("Message is required").into());
        }
        let provider = self.chat_provider()?;

        tracing::debug!(stage = %Stage::Generating, "opening chat stream");
        let chunks = provider.chat_stream(&ChatRequest::new(prompt)).await?;

        Ok(reconcile(chunks, Arc::clone(&self.history), prompt.to_owned()))
    }

    /// Run a speech-to-text transcription.
    ///
    /// The raw provider response is normalized before it is returned:
    /// missing fields resolve to sentinels, never to absent values.
    ///
    /// # Errors
    ///
    /// Returns an error for empty audio or a missing ElevenLabs
    /// credential. Provider failures surface as `Transcription failed`
    /// with the upstream message attached as details.
    pub async fn run_stt(&self, audio: TranscriptionRequest) -> Result<Transcript> {
        tracing::debug!(stage = %Stage::Validating, "transcription request");
        if audio.audio.is_empty() {
            return Err(PipelineError::input("No audio file uploaded").into());
        }
        let provider = self.speech_to_text_provider()?;

        tracing::debug!(
            stage = %Stage::Generating,
            file = %audio.upload_file_name(),
            "transcribing audio"
        );
        let raw = provider
            .transcribe(&audio)
            .await
            .map_err(|err| summarize(err, "Transcription failed"))?;

        tracing::debug!(stage = %Stage::Normalizing, "normalizing transcription");
        let transcript = normalize::normalize_transcription(&raw);

        self.record(HistoryEntry::new(
            Capability::SpeechToText,
            audio.summary(),
            transcript.text.clone(),
        ))
        .await;

        Ok(transcript)
    }

    /// Run a text-to-speech synthesis.
    ///
    /// # Errors
    ///
    /// Returns an error for blank input or a missing ElevenLabs
    /// credential. Provider failures surface as `Failed to generate
    /// audio` with the upstream message attached as details.
    pub async fn run_tts(&self, text: &str) -> Result<SpeechAudio> {
        tracing::debug!(stage = %Stage::Validating, "speech request");
        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(PipelineError::input("Text is required").into());
        }
        let provider = self.text_to_speech_provider()?;

        tracing::debug!(stage = %Stage::Generating, "synthesizing speech");
        let audio = provider
            .synthesize(prompt)
            .await
            .map_err(|err| summarize(err, "Failed to generate audio"))?;

        self.record(HistoryEntry::new(
            Capability::TextToSpeech,
            prompt,
            audio.mime_type.clone(),
        ))
        .await;

        Ok(audio)
    }

    /// Run a text-to-image generation with hosted storage.
    ///
    /// Two chained provider calls: generation produces raw image bytes,
    /// then storage uploads them and returns the hosted URL. Storage is
    /// only attempted after generation succeeded, and the two legs fail
    /// under distinct error kinds so callers can tell a model failure
    /// from a storage failure. Both adapters are checked before the
    /// first call; a half-configured chain never generates an image it
    /// cannot store.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank prompt, a missing Hugging Face or
    /// Cloudinary credential, a generation failure (`Image generation
    /// failed`) or an upload failure (`Upload to Cloudinary failed`).
    pub async fn run_tti(&self, prompt: &str) -> Result<StoredImage> {
        tracing::debug!(stage = %Stage::Validating, "image request");
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(PipelineError::input("Prompt is required").into());
        }
        let generator = self.image_generation_provider()?;
        let storage = self.image_storage_provider()?;

        tracing::debug!(stage = %Stage::Generating, "generating image");
        let image = generator
            .generate(prompt)
            .await
            .map_err(|err| summarize(err, "Image generation failed"))?;

        let debug_path = std::env::temp_dir().join(DEBUG_IMAGE_FILE);
        if let Err(err) = std::fs::write(&debug_path, &image.bytes) {
            tracing::warn!("Failed to write debug image {}: {err}", debug_path.display());
        }

        tracing::debug!(stage = %Stage::Storing, size = image.bytes.len(), "uploading image");
        let metadata = ImageMetadata::new(prompt, generator.model_name());
        let raw = storage
            .upload(&image, &metadata)
            .await
            .map_err(|err| summarize(err, "Upload to Cloudinary failed"))?;

        tracing::debug!(stage = %Stage::Normalizing, "normalizing upload");
        let stored = normalize::normalize_upload(&raw);

        self.record(HistoryEntry::new(
            Capability::TextToImage,
            prompt,
            stored.image_url.clone(),
        ))
        .await;

        Ok(stored)
    }

    fn chat_provider(&self) -> Result<&SharedChatProvider> {
        self.chat.as_ref().ok_or_else(|| {
            missing_credential("DeepSeek API key missing", DeepSeekConfig::ENV_API_KEY)
        })
    }

    fn speech_to_text_provider(&self) -> Result<&SharedSpeechToTextProvider> {
        self.speech_to_text.as_ref().ok_or_else(|| {
            missing_credential("ElevenLabs API key missing", ElevenLabsConfig::ENV_API_KEY)
        })
    }

    fn text_to_speech_provider(&self) -> Result<&SharedTextToSpeechProvider> {
        self.text_to_speech.as_ref().ok_or_else(|| {
            missing_credential("ElevenLabs API key missing", ElevenLabsConfig::ENV_API_KEY)
        })
    }

    fn image_generation_provider(&self) -> Result<&SharedImageGenerationProvider> {
        self.image_generation.as_ref().ok_or_else(|| {
            missing_credential("HF token missing", HuggingFaceConfig::ENV_TOKEN)
        })
    }

    fn image_storage_provider(&self) -> Result<&SharedImageStorageProvider> {
        self.image_storage.as_ref().ok_or_else(|| {
            Error::Pipeline(
                PipelineError::config(
                    "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must all be set",
                )
                .with_summary("Cloudinary mis-configuration"),
            )
        })
    }

    /// Append a history entry, logging instead of failing on error.
    async fn record(&self, entry: HistoryEntry) {
        let capability = entry.capability;
        if let Err(err) = self.history.append(entry).await {
            tracing::warn!("Failed to append {capability} history: {err}");
        }
    }
}

/// Config error for an adapter whose credential was absent at startup.
fn missing_credential(summary: &str, name: &str) -> Error {
    Error::Pipeline(PipelineError::config(format!("{name} is not set")).with_summary(summary))
}

/// Replace a pipeline error's summary, demoting its message to details.
fn summarize(err: Error, summary: &str) -> Error {
    match err {
        Error::Pipeline(inner) => Error::Pipeline(inner.with_summary(summary)),
        other => other,
    }
}

/// Builder for [`Pipeline`].
///
/// Providers left unset stay unavailable and their capabilities fail
/// with a config error at request time. History defaults to an
/// in-memory store.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
///
/// use mindseek::pipeline::Pipeline;
/// use mindseek::providers::DeepSeek;
///
/// let pipeline = Pipeline::builder()
///     .chat(Arc::new(DeepSeek::from_env()?))
///     .build();
/// ```
#[derive(Default)]
pub struct PipelineBuilder {
    chat: Option<SharedChatProvider>,
    speech_to_text: Option<SharedSpeechToTextProvider>,
    text_to_speech: Option<SharedTextToSpeechProvider>,
    image_generation: Option<SharedImageGenerationProvider>,
    image_storage: Option<SharedImageStorageProvider>,
    history: Option<SharedHistoryStore>,
}

impl fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("has_chat", &self.chat.is_some())
            .field("has_speech_to_text", &self.speech_to_text.is_some())
            .field("has_text_to_speech", &self.text_to_speech.is_some())
            .field("has_image_generation", &self.image_generation.is_some())
            .field("has_image_storage", &self.image_storage.is_some())
            .field("has_history", &self.history.is_some())
            .finish()
    }
}

impl PipelineBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chat provider.
    #[must_use]
    pub fn chat(mut self, provider: SharedChatProvider) -> Self {
        self.chat = Some(provider);
        self
    }

    /// Set the speech-to-text provider.
    #[must_use]
    pub fn speech_to_text(mut self, provider: SharedSpeechToTextProvider) -> Self {
        self.speech_to_text = Some(provider);
        self
    }

    /// Set the text-to-speech provider.
    #[must_use]
    pub fn text_to_speech(mut self, provider: SharedTextToSpeechProvider) -> Self {
        self.text_to_speech = Some(provider);
        self
    }

    /// Set the image generation provider.
    #[must_use]
    pub fn image_generation(mut self, provider: SharedImageGenerationProvider) -> Self {
        self.image_generation = Some(provider);
        self
    }

    /// Set the image storage provider.
    #[must_use]
    pub fn image_storage(mut self, provider: SharedImageStorageProvider) -> Self {
        self.image_storage = Some(provider);
        self
    }

    /// Set the history store.
    #[must_use]
    pub fn history(mut self, history: SharedHistoryStore) -> Self {
        self.history = Some(history);
        self
    }

    /// Assemble the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            chat: self.chat,
            speech_to_text: self.speech_to_text,
            text_to_speech: self.text_to_speech,
            image_generation: self.image_generation,
            image_storage: self.image_storage,
            history: self
                .history
                .unwrap_or_else(|| Arc::new(InMemoryHistory::new())),
        }
    }
}
