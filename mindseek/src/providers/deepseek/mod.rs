//! DeepSeek API client implementation.
//!
//! This module provides a streaming chat client for the DeepSeek API,
//! which follows the OpenAI chat-completions wire format (SSE lines
//! terminated by a `[DONE]` sentinel).

mod chat;
mod client;
mod config;
mod stream;

pub use client::DeepSeek;
pub use config::DeepSeekConfig;
