//! Provider adapter implementations.
//!
//! Each external service is organized into its own submodule.
//!
//! # Available Providers
//!
//! - [`deepseek`] - DeepSeek streaming chat
//! - [`elevenlabs`] - ElevenLabs speech-to-text and text-to-speech
//! - [`huggingface`] - Hugging Face routed image generation
//! - [`cloudinary`] - Cloudinary image storage
//! - [`mock`] - Scripted fakes for tests

pub mod cloudinary;
pub mod deepseek;
pub mod elevenlabs;
pub mod huggingface;
pub mod mock;

pub use cloudinary::{Cloudinary, CloudinaryConfig};
pub use deepseek::{DeepSeek, DeepSeekConfig};
pub use elevenlabs::{ElevenLabs, ElevenLabsConfig};
pub use huggingface::{HuggingFace, HuggingFaceConfig};
