//! Chat message types and the streaming chat provider trait.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::stream::ChunkStream;

/// Author role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The prompting user.
    User,
    /// The responding model.
    Assistant,
    /// A surfaced failure, terminal for its request.
    Error,
}

impl ChatRole {
    /// Get the role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chat message as emitted by the streaming pipeline.
///
/// While a response is arriving, `content` holds everything accumulated
/// so far and `streaming` is `true`. The terminal emission carries
/// `streaming: false`; the flag never flips back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author role.
    pub role: ChatRole,
    /// Message content accumulated so far.
    pub content: String,
    /// Whether more content is still arriving.
    pub streaming: bool,
}

impl ChatMessage {
    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            streaming: false,
        }
    }

    /// Create an in-flight assistant message.
    #[must_use]
    pub fn partial(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            streaming: true,
        }
    }

    /// Create a completed assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            streaming: false,
        }
    }

    /// Create a terminal error message.
    #[must_use]
    pub fn error(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Error,
            content: content.into(),
            streaming: false,
        }
    }

    /// Whether this message ends its request.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.streaming
    }
}

/// A chat completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user prompt.
    pub text: String,
    /// Model override; the provider default applies when unset.
    pub model: Option<String>,
}

impl ChatRequest {
    /// Create a chat request from a user prompt.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
        }
    }

    /// Override the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

/// A provider that streams chat completions.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Stream a chat completion as incremental chunks.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the provider
    /// rejects it before the stream starts.
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream>;

    /// Get the provider name.
    fn provider_name(&self) -> &'static str;
}

/// Shared reference to a chat provider.
pub type SharedChatProvider = std::sync::Arc<dyn ChatProvider>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod chat_role {
        use super::*;

        #[test]
        fn serializes_lowercase() {
            assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), r#""user""#);
            assert_eq!(
                serde_json::to_string(&ChatRole::Assistant).unwrap(),
                r#""assistant""#
            );
            assert_eq!(
                serde_json::to_string(&ChatRole::Error).unwrap(),
                r#""error""#
            );
        }

        #[test]
        fn display_matches_as_str() {
            assert_eq!(ChatRole::Error.to_string(), "error");
        }
    }

    mod chat_message {
        use super::*;

        #[test]
        fn partial_is_streaming() {
            let msg = ChatMessage::partial("Hel");
            assert_eq!(msg.role, ChatRole::Assistant);
            assert!(msg.streaming);
            assert!(!msg.is_terminal());
        }

        #[test]
        fn assistant_is_terminal() {
            let msg = ChatMessage::assistant("Hello, world");
            assert!(!msg.streaming);
            assert!(msg.is_terminal());
        }

        #[test]
        fn error_is_terminal() {
            let message = ChatMessage::error("Error: Failed to fetch response. Try again.");
            assert!(message.is_terminal());
        }

        #[test]
        fn round_trips_through_json() {
            let msg = ChatMessage::partial("Hel");
            let json = serde_json::to_string(&msg).unwrap();
            let back: ChatMessage = serde_json::from_str(&json).unwrap();
            assert_eq!(back, msg);
        }
    }

    mod chat_request {
        use super::*;

        #[test]
        fn with_model_overrides_default() {
            let request = ChatRequest::new("hi").with_model("deepseek-reasoner");
            assert_eq!(request.model.as_deref(), Some("deepseek-reasoner"));
        }
    }
}
