//! Mindseek - multi-modal generation pipelines over hosted AI providers
//!
//! This crate provides the orchestration layer of a multi-modal assistant:
//! streaming chat, speech-to-text, text-to-speech and two-stage
//! text-to-image generation, each validated, dispatched to its provider,
//! normalized into a uniform result shape and recorded in a bounded
//! per-capability history.

pub mod audio;
pub mod capability;
pub mod chat;
pub mod credentials;
pub mod error;
pub mod history;
pub mod image;
pub mod normalize;
pub mod pipeline;
pub mod prelude;
pub mod providers;
pub mod result;
pub mod stream;

pub use error::{Error, ErrorEnvelope, ErrorKind, HistoryError, PipelineError, Result};
