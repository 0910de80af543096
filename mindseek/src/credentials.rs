//! Credential lookup for provider adapters.
//!
//! Credentials are resolved once, at pipeline construction, through a
//! [`CredentialSource`]. The pipelines check presence before any network
//! call; a missing credential is a precondition failure, not a provider
//! error.

use std::collections::HashMap;

use crate::error::PipelineError;

/// Source of provider credentials.
pub trait CredentialSource: Send + Sync {
    /// Look up a credential by name.
    ///
    /// Returns `None` when the credential is absent or blank.
    fn get(&self, name: &str) -> Option<String>;

    /// Whether a credential is present.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// Credential source backed by process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Create an environment-backed credential source.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CredentialSource for EnvCredentials {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

/// Fixed credential source for tests and embedded configuration.
///
/// An empty source misses every lookup, which makes it a convenient fake
/// for exercising precondition failures.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn get(&self, name: &str) -> Option<String> {
        self.values
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }
}

/// Look up a required credential.
///
/// # Errors
///
/// Returns a config error naming the credential when it is absent.
pub fn require(source: &dyn CredentialSource, name: &str) -> Result<String, PipelineError> {
    source
        .get(name)
        .ok_or_else(|| PipelineError::config(format!("{name} is not set")))
}
