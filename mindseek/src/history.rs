//! Bounded per-capability generation history.
//!
//! Each capability keeps its own record of past generations, capped at
//! [`HISTORY_LIMIT`] entries; appending beyond the bound evicts the
//! oldest entry atomically with the insert. The store is an injected
//! collaborator so pipelines can be tested against fakes, with an
//! in-memory implementation for ephemeral use and a SQLite-backed one
//! that survives process restarts.

pub mod in_memory;
#[cfg(feature = "history-sqlite")]
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::capability::Capability;
use crate::error::Result;

/// Maximum number of entries retained per capability.
pub const HISTORY_LIMIT: usize = 10;

/// A recorded generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique entry id.
    pub id: Uuid,
    /// The capability that produced this entry.
    pub capability: Capability,
    /// Summary of the request: prompt text or upload file name.
    pub request: String,
    /// Summary of the result: content, transcript, MIME type or URL.
    pub result: String,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(
        capability: Capability,
        request: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            capability,
            request: request.into(),
            result: result.into(),
            created_at: Utc::now(),
        }
    }
}

/// Bounded, capability-keyed store of past generations.
///
/// Listing order derives from insertion order, newest first, not from
/// timestamp comparison.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Append an entry, evicting the oldest beyond [`HISTORY_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store rejects the write.
    async fn append(&self, entry: HistoryEntry) -> Result<()>;

    /// Remove one entry by id, returning whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store rejects the delete.
    async fn remove(&self, capability: Capability, id: Uuid) -> Result<bool>;

    /// Remove all entries for a capability.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store rejects the delete.
    async fn clear(&self, capability: Capability) -> Result<()>;

    /// List entries for a capability, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    async fn list(&self, capability: Capability) -> Result<Vec<HistoryEntry>>;
}

/// Shared reference to a history store.
pub type SharedHistoryStore = std::sync::Arc<dyn HistoryStore>;
