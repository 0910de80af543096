//! ElevenLabs API client implementation.
//!
//! This module provides a client for the ElevenLabs API, supporting:
//! - Speech-to-Text (scribe transcription with diarization)
//! - Text-to-Speech (voice synthesis)

mod audio;
mod client;
mod config;

pub use client::ElevenLabs;
pub use config::ElevenLabsConfig;
