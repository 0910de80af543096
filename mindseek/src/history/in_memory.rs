//! In-memory history store.
//!
//! [`InMemoryHistory`] keeps entries in process memory, which makes it
//! the natural store for tests and short-lived sessions. Data is lost on
//! drop.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{HISTORY_LIMIT, HistoryEntry, HistoryStore};
use crate::capability::Capability;
use crate::error::Result;

/// In-memory history store.
///
/// Entries are held newest-first per capability behind a single
/// [`RwLock`], so the bound is enforced atomically with each insert.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    entries: RwLock<HashMap<Capability, Vec<HistoryEntry>>>,
}

impl InMemoryHistory {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.entries.write().await;
        let list = entries.entry(entry.capability).or_default();
        list.insert(0, entry);
        list.truncate(HISTORY_LIMIT);
        Ok(())
    }

    async fn remove(&self, capability: Capability, id: Uuid) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let Some(list) = entries.get_mut(&capability) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|entry| entry.id != id);
        Ok(list.len() < before)
    }

    async fn clear(&self, capability: Capability) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(&capability);
        Ok(())
    }

    async fn list(&self, capability: Capability) -> Result<Vec<HistoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.get(&capability).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn entry(capability: Capability, request: &str) -> HistoryEntry {
        HistoryEntry::new(capability, request, "result")
    }

    mod append_and_list {
        use super::*;

        #[tokio::test]
        async fn lists_newest_first() {
            let store = InMemoryHistory::new();
            store.append(entry(Capability::Chat, "first")).await.unwrap();
            store.append(entry(Capability::Chat, "second")).await.unwrap();
            store.append(entry(Capability::Chat, "third")).await.unwrap();

            let entries = store.list(Capability::Chat).await.unwrap();
            let requests: Vec<&str> = entries.iter().map(|e| e.request.as_str()).collect();
            assert_eq!(requests, vec!["third", "second", "first"]);
        }

        #[tokio::test]
        async fn empty_capability_lists_nothing() {
            let store = InMemoryHistory::new();
            assert!(store.list(Capability::TextToSpeech).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn eviction_keeps_newest_ten() {
            let store = InMemoryHistory::new();
            for i in 0..=10 {
                store
                    .append(entry(Capability::Chat, &format!("prompt {i}")))
                    .await
                    .unwrap();
            }

            let entries = store.list(Capability::Chat).await.unwrap();
            assert_eq!(entries.len(), HISTORY_LIMIT);
            assert_eq!(entries.first().unwrap().request, "prompt 10");
            assert_eq!(entries.last().unwrap().request, "prompt 1");
            assert!(entries.iter().all(|e| e.request != "prompt 0"));
        }
    }

    mod remove_and_clear {
        use super::*;

        #[tokio::test]
        async fn remove_deletes_only_the_target() {
            let store = InMemoryHistory::new();
            let keep = entry(Capability::SpeechToText, "keep");
            let drop = entry(Capability::SpeechToText, "drop");
            let drop_id = drop.id;
            store.append(keep).await.unwrap();
            store.append(drop).await.unwrap();

            assert!(store.remove(Capability::SpeechToText, drop_id).await.unwrap());
            let entries = store.list(Capability::SpeechToText).await.unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].request, "keep");
        }

        #[tokio::test]
        async fn remove_misses_unknown_id() {
            let store = InMemoryHistory::new();
            store.append(entry(Capability::Chat, "only")).await.unwrap();
            assert!(!store.remove(Capability::Chat, Uuid::new_v4()).await.unwrap());
        }

        #[tokio::test]
        async fn clear_empties_one_capability() {
            let store = InMemoryHistory::new();
            store.append(entry(Capability::Chat, "c")).await.unwrap();
            store.append(entry(Capability::TextToImage, "i")).await.unwrap();

            store.clear(Capability::Chat).await.unwrap();
            assert!(store.list(Capability::Chat).await.unwrap().is_empty());
            assert_eq!(store.list(Capability::TextToImage).await.unwrap().len(), 1);
        }
    }

    mod isolation {
        use super::*;

        #[tokio::test]
        async fn capabilities_do_not_share_entries() {
            let store = InMemoryHistory::new();
            store.append(entry(Capability::Chat, "chat")).await.unwrap();
            store.append(entry(Capability::SpeechToText, "stt")).await.unwrap();

            assert_eq!(store.list(Capability::Chat).await.unwrap().len(), 1);
            assert_eq!(store.list(Capability::SpeechToText).await.unwrap().len(), 1);
            assert!(store.list(Capability::TextToSpeech).await.unwrap().is_empty());
        }
    }

    mod concurrency {
        use super::*;

        #[tokio::test]
        async fn concurrent_appends_respect_the_bound() {
            let store = Arc::new(InMemoryHistory::new());
            let mut handles = Vec::new();
            for i in 0..25 {
                let store = Arc::clone(&store);
                handles.push(tokio::spawn(async move {
                    store
                        .append(HistoryEntry::new(
                            Capability::Chat,
                            format!("prompt {i}"),
                            "result",
                        ))
                        .await
                }));
            }
            for handle in handles {
                handle.await.unwrap().unwrap();
            }

            assert_eq!(store.list(Capability::Chat).await.unwrap().len(), HISTORY_LIMIT);
        }
    }
}
