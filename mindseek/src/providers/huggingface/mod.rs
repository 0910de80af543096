//! Hugging Face inference router client implementation.
//!
//! Routes text-to-image requests through the Hugging Face inference
//! router to a downstream provider (fal-ai by default) and returns the
//! raw image bytes.

mod client;
mod config;
mod image;

pub use client::HuggingFace;
pub use config::HuggingFaceConfig;
