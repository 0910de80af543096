//! Unified error types for the mindseek pipelines.
//!
//! This module provides the error hierarchy covering:
//! - Pipeline errors (input validation, credentials, providers, storage)
//! - History store errors
//! - The boundary error envelope with its HTTP-style status

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type alias for mindseek operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the mindseek library.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Generation pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// History store error.
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP-style status code for a boundary response carrying this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Pipeline(err) => err.status_code(),
            _ => 500,
        }
    }

    /// Convert into the boundary error envelope.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Pipeline(err) => err.envelope(),
            other => ErrorEnvelope {
                error: other.to_string(),
                details: None,
            },
        }
    }
}

/// Error raised while running a generation pipeline.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PipelineError {
    /// The error kind.
    pub kind: ErrorKind,
    /// The provider name (e.g., "deepseek", "cloudinary").
    pub provider: Option<String>,
    /// Human-readable summary.
    pub message: String,
    /// Upstream HTTP status, when one was received.
    pub status: Option<u16>,
    /// Upstream or lower-level detail.
    pub details: Option<String>,
}

/// Categories of pipeline errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Missing or empty request payload. Raised before any provider call.
    Input,
    /// Required credential absent. Raised before any provider call.
    Config,
    /// Upstream generation provider failure (non-2xx, network, decode).
    Provider,
    /// Hosted-storage upload failure, distinct from generation failure.
    Storage,
    /// Internal fault outside any provider call.
    Internal,
}

impl PipelineError {
    /// Create an input validation error.
    #[must_use]
    pub fn input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Input,
            provider: None,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Create a configuration error for a missing credential.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config,
            provider: None,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Create a provider error.
    #[must_use]
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Provider,
            provider: Some(provider.into()),
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Create a provider error carrying the upstream HTTP status and body.
    #[must_use]
    pub fn provider_status(
        provider: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::Provider,
            provider: Some(provider.into()),
            message: format!("HTTP error {status}: {}", body.into()),
            status: Some(status),
            details: None,
        }
    }

    /// Create a network error without an attributed provider.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Provider,
            provider: None,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Create a storage error.
    #[must_use]
    pub fn storage(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Storage,
            provider: Some(provider.into()),
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Internal,
            provider: None,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    /// Re-tag this error as a storage failure, keeping its message.
    ///
    /// Used by the upload stage so transport failures carry the storage
    /// kind instead of the generation kind.
    #[must_use]
    pub fn into_storage(mut self) -> Self {
        self.kind = ErrorKind::Storage;
        self
    }

    /// Replace the summary, demoting the current message to `details`.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        if self.details.is_none() {
            self.details = Some(std::mem::take(&mut self.message));
        }
        self.message = summary.into();
        self
    }

    /// HTTP-style status code for a boundary response carrying this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::Input => 400,
            _ => 500,
        }
    }

    /// Convert into the boundary error envelope.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.message.clone(),
            details: self.details.clone(),
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{provider}] ")?;
        }
        write!(f, "{}", self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({details})")?;
        }
        Ok(())
    }
}

impl std::error::Error for PipelineError {}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network("Request timed out")
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Pipeline(PipelineError::from(err))
    }
}

/// Boundary error shape surfaced to callers: `{ error, details? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Human-readable error summary.
    pub error: String,
    /// Optional upstream or lower-level detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Error type for history store failures.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HistoryError {
    /// Underlying SQLite failure.
    #[cfg(feature = "history-sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The connection lock was poisoned or unavailable.
    #[error("Lock error: {0}")]
    Lock(String),

    /// A blocking task failed to complete.
    #[error("Task error: {0}")]
    Task(String),

    /// A stored entry could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    mod error {
        use super::*;

        #[test]
        fn from_pipeline_error() {
            let err: Error = PipelineError::input("empty prompt").into();
            assert!(matches!(err, Error::Pipeline(_)));
            assert_eq!(err.status_code(), 400);
        }

        #[test]
        fn from_history_error() {
            let err: Error = HistoryError::Lock("poisoned".into()).into();
            assert!(matches!(err, Error::History(_)));
            assert_eq!(err.status_code(), 500);
        }

        #[test]
        fn non_pipeline_envelope_uses_display() {
            let err: Error = HistoryError::Task("join failed".into()).into();
            let envelope = err.envelope();
            assert!(envelope.error.contains("join failed"));
            assert!(envelope.details.is_none());
        }
    }

    mod pipeline_error {
        use super::*;

        #[test]
        fn input_is_bad_request() {
            let err = PipelineError::input("Prompt is required");
            assert_eq!(err.kind, ErrorKind::Input);
            assert_eq!(err.status_code(), 400);
            assert_eq!(err.envelope().error, "Prompt is required");
        }

        #[test]
        fn config_is_server_error() {
            let err = PipelineError::config("HF token missing");
            assert_eq!(err.kind, ErrorKind::Config);
            assert_eq!(err.status_code(), 500);
        }

        #[test]
        fn provider_status_formats_message() {
            let err = PipelineError::provider_status("elevenlabs", 429, "slow down");
            assert_eq!(err.status, Some(429));
            assert_eq!(err.message, "HTTP error 429: slow down");
            assert_eq!(err.status_code(), 500);
        }

        #[test]
        fn display_includes_provider() {
            let err = PipelineError::provider("deepseek", "boom");
            assert_eq!(err.to_string(), "[deepseek] boom");
        }

        #[test]
        fn display_includes_details() {
            let err = PipelineError::provider("huggingface", "boom")
                .with_summary("Image generation failed");
            assert_eq!(
                err.to_string(),
                "[huggingface] Image generation failed (boom)"
            );
        }

        #[test]
        fn into_storage_retags_kind() {
            let err = PipelineError::network("Request timed out").into_storage();
            assert_eq!(err.kind, ErrorKind::Storage);
            assert_eq!(err.message, "Request timed out");
        }

        #[test]
        fn with_summary_preserves_existing_details() {
            let err = PipelineError::provider("cloudinary", "denied")
                .with_summary("Upload to Cloudinary failed")
                .with_summary("Upload to Cloudinary failed");
            assert_eq!(err.details.as_deref(), Some("denied"));
        }

        #[test]
        fn envelope_carries_details() {
            let err = PipelineError::provider("huggingface", "HTTP error 503: busy")
                .with_summary("Image generation failed");
            let envelope = err.envelope();
            assert_eq!(envelope.error, "Image generation failed");
            assert_eq!(envelope.details.as_deref(), Some("HTTP error 503: busy"));
        }
    }

    mod envelope {
        use super::*;

        #[test]
        fn serializes_without_null_details() {
            let envelope = ErrorEnvelope {
                error: "No audio file uploaded".into(),
                details: None,
            };
            let json = serde_json::to_string(&envelope).unwrap();
            assert_eq!(json, r#"{"error":"No audio file uploaded"}"#);
        }

        #[test]
        fn round_trips_details() {
            let envelope = ErrorEnvelope {
                error: "Transcription failed".into(),
                details: Some("HTTP error 401: unauthorized".into()),
            };
            let json = serde_json::to_string(&envelope).unwrap();
            let back: ErrorEnvelope = serde_json::from_str(&json).unwrap();
            assert_eq!(back, envelope);
        }
    }
}
