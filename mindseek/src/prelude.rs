//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits for easy access.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mindseek::prelude::*;
//! ```

pub use crate::providers::{
    Cloudinary, CloudinaryConfig, DeepSeek, DeepSeekConfig, ElevenLabs, ElevenLabsConfig,
    HuggingFace, HuggingFaceConfig,
};

pub use crate::capability::{Capability, GenerationRequest, Payload};
pub use crate::error::{Error, ErrorEnvelope, ErrorKind, HistoryError, PipelineError, Result};
pub use crate::pipeline::{Pipeline, PipelineBuilder, Stage};

pub use crate::audio::{
    AudioFormat, RawTranscription, RawTranscriptionWord, SharedSpeechToTextProvider,
    SharedTextToSpeechProvider, SpeechAudio, SpeechToTextProvider, TextToSpeechProvider,
    Transcript, TranscriptWord, TranscriptionRequest,
};
pub use crate::chat::{ChatMessage, ChatProvider, ChatRequest, ChatRole, SharedChatProvider};
pub use crate::credentials::{CredentialSource, EnvCredentials, StaticCredentials};
pub use crate::history::in_memory::InMemoryHistory;
#[cfg(feature = "history-sqlite")]
pub use crate::history::sqlite::SqliteHistory;
pub use crate::history::{HistoryEntry, HistoryStore, SharedHistoryStore};
pub use crate::image::{
    GeneratedImage, ImageGenerationProvider, ImageMetadata, ImageStorageProvider, RawUpload,
    SharedImageGenerationProvider, SharedImageStorageProvider, StoredImage,
};
pub use crate::result::GenerationResult;
pub use crate::stream::{ChatAccumulator, ChunkStream, MessageStream, StreamChunk};
