//! SQLite-backed history store.
//!
//! [`SqliteHistory`] persists generation history in a SQLite database,
//! surviving process restarts. Uses [`rusqlite`] for synchronous access,
//! bridged to async via [`tokio::task::spawn_blocking`].
//!
//! # Storage Model
//!
//! Entries are stored as JSON rows in the `history` table, ordered by an
//! auto-incrementing `seq` that fixes the insertion order listing relies
//! on. The retention bound is enforced in the same transaction as each
//! insert, so no state above the bound is ever observable.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, params};
use uuid::Uuid;

use super::{HISTORY_LIMIT, HistoryEntry, HistoryStore};
use crate::capability::Capability;
use crate::error::{HistoryError, Result};

/// SQLite-backed history store.
///
/// Cloneable via `Arc<Mutex<Connection>>`; multiple handles may share a
/// single database. Schema is auto-created on construction, and all
/// blocking I/O is offloaded to the tokio blocking thread pool.
#[derive(Debug, Clone)]
pub struct SqliteHistory {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteHistory {
    /// Opens (or creates) a database at `path` and initializes the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(HistoryError::from)?;
        Self::from_connection(conn)
    }

    /// Opens an ephemeral in-memory database (data lost on drop).
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(HistoryError::from)?;
        Self::from_connection(conn)
    }

    /// Wraps an existing [`Connection`], applying pragmas and schema setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the pragmas or schema statements fail.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;\
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(HistoryError::from)?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS history (
                seq        INTEGER PRIMARY KEY AUTOINCREMENT,
                entry_id   TEXT    NOT NULL UNIQUE,
                capability TEXT    NOT NULL,
                entry_data TEXT    NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_capability
            ON history (capability, seq);",
        )
        .map_err(HistoryError::from)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Bridges a synchronous closure onto the tokio blocking thread pool.
    ///
    /// The closure receives a reference to the locked [`Connection`] and
    /// operates in [`HistoryError`] space; conversion to [`Result`]
    /// happens at the boundary via the double-`?` pattern.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> std::result::Result<T, HistoryError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        Ok(tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|e| HistoryError::Lock(e.to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| HistoryError::Task(e.to_string()))??)
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let entry_id = entry.id.to_string();
        let capability = entry.capability.as_str();
        let json = serde_json::to_string(&entry).map_err(HistoryError::from)?;

        self.blocking(move |conn| {
            let tx = conn.unchecked_transaction()?;

            tx.execute(
                "INSERT INTO history (entry_id, capability, entry_data) \
                 VALUES (?1, ?2, ?3)",
                params![entry_id, capability, json],
            )?;

            tx.execute(
                "DELETE FROM history \
                 WHERE capability = ?1 AND seq NOT IN ( \
                     SELECT seq FROM history \
                     WHERE capability = ?1 \
                     ORDER BY seq DESC LIMIT ?2 \
                 )",
                params![capability, HISTORY_LIMIT as i64],
            )?;

            tx.commit()?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, capability: Capability, id: Uuid) -> Result<bool> {
        let entry_id = id.to_string();
        self.blocking(move |conn| {
            let rows = conn.execute(
                "DELETE FROM history WHERE capability = ?1 AND entry_id = ?2",
                params![capability.as_str(), entry_id],
            )?;
            Ok(rows > 0)
        })
        .await
    }

    async fn clear(&self, capability: Capability) -> Result<()> {
        self.blocking(move |conn| {
            conn.execute(
                "DELETE FROM history WHERE capability = ?1",
                params![capability.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn list(&self, capability: Capability) -> Result<Vec<HistoryEntry>> {
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT entry_data FROM history \
                 WHERE capability = ?1 \
                 ORDER BY seq DESC",
            )?;

            stmt.query_map(params![capability.as_str()], |row| row.get::<_, String>(0))?
                .map(|r| Ok(serde_json::from_str::<HistoryEntry>(&r?)?))
                .collect::<std::result::Result<Vec<_>, HistoryError>>()
        })
        .await
    }
}
