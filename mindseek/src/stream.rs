//! Streaming chunk types and the chat reconciler.
//!
//! The reconciler consumes provider chunks in arrival order on a single
//! logical consumer and turns them into an ordered sequence of
//! [`ChatMessage`] emissions: one partial per chunk, then exactly one
//! terminal emission. It is a lazy stream; dropping it cancels reading
//! without emitting anything further.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::chat::ChatMessage;
use crate::error::Result;
use crate::history::{HistoryEntry, SharedHistoryStore};

/// A chunk of a streaming chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StreamChunk {
    /// Incremental text content.
    Text {
        /// The appended text.
        content: String,
    },
    /// Stream completed normally.
    Done,
    /// Error raised mid-stream.
    Error {
        /// Error message.
        message: String,
    },
}

impl StreamChunk {
    /// Creates a text chunk.
    #[inline]
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Creates a done chunk.
    #[must_use]
    pub const fn done() -> Self {
        Self::Done
    }

    /// Creates an error chunk.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns the text content if this is a text chunk.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content),
            _ => None,
        }
    }

    /// Returns `true` if this is a text chunk.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Returns `true` if this is a done chunk.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns `true` if this is an error chunk.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// A boxed stream of chat chunks as produced by a provider.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// A boxed stream of reconciled chat messages.
pub type MessageStream = Pin<Box<dyn Stream<Item = ChatMessage> + Send>>;

/// Content of the terminal message emitted when a stream fails.
pub const STREAM_FAILURE_MESSAGE: &str = "Error: Failed to fetch response. Try again.";

/// Accumulates streamed text chunks into the full response.
#[derive(Debug, Clone, Default)]
pub struct ChatAccumulator {
    text: String,
}

impl ChatAccumulator {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a chunk; only text chunks contribute content.
    pub fn apply(&mut self, chunk: &StreamChunk) {
        if let StreamChunk::Text { content } = chunk {
            self.text.push_str(content);
        }
    }

    /// The content accumulated so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the accumulator, returning the full content.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Reconcile a chunk stream into an ordered sequence of chat messages.
///
/// Each text chunk emits an updated partial message with
/// `streaming: true`. The end of the stream emits one final message with
/// `streaming: false` and the same accumulated content, and that content
/// is appended to `history` together with the prompt. A mid-stream
/// failure emits a terminal `role: error` message instead; content
/// reconciled up to that point is preserved and still appended.
///
/// History append failures are logged and do not interrupt the emission;
/// cancellation by dropping the stream appends nothing further.
#[must_use]
pub fn reconcile(
    chunks: ChunkStream,
    history: SharedHistoryStore,
    prompt: String,
) -> MessageStream {
    Box::pin(async_stream::stream! {
        let mut chunks = chunks;
        let mut acc = ChatAccumulator::new();
        let mut failed = false;

        while let Some(next) = chunks.next().await {
            match next {
                Ok(chunk @ StreamChunk::Text { .. }) => {
                    acc.apply(&chunk);
                    yield ChatMessage::partial(acc.text());
                }
                Ok(StreamChunk::Done) => break,
                Ok(StreamChunk::Error { message }) => {
                    tracing::warn!("Chat stream reported an error: {message}");
                    failed = true;
                    break;
                }
                Err(err) => {
                    tracing::warn!("Chat stream failed: {err}");
                    failed = true;
                    break;
                }
            }
        }

        if failed {
            if !acc.text().is_empty() {
                append_chat_entry(&history, &prompt, acc.text()).await;
            }
            yield ChatMessage::error(STREAM_FAILURE_MESSAGE);
        } else {
            let content = acc.into_text();
            append_chat_entry(&history, &prompt, &content).await;
            yield ChatMessage::assistant(content);
        }
    })
}

async fn append_chat_entry(history: &SharedHistoryStore, prompt: &str, content: &str) {
    let entry = HistoryEntry::new(Capability::Chat, prompt, content);
    if let Err(err) = history.append(entry).await {
        tracing::warn!("Failed to append chat history: {err}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::PipelineError;
    use crate::history::{HistoryStore, in_memory::InMemoryHistory};

    fn chunk_stream(chunks: Vec<Result<StreamChunk>>) -> ChunkStream {
        Box::pin(futures::stream::iter(chunks))
    }

    mod stream_chunk {
        use super::*;

        #[test]
        fn predicates_match_variants() {
            assert!(StreamChunk::text("hi").is_text());
            assert!(StreamChunk::done().is_done());
            assert!(StreamChunk::error("boom").is_error());
            assert!(!StreamChunk::done().is_text());
        }

        #[test]
        fn as_text_returns_content() {
            assert_eq!(StreamChunk::text("hi").as_text(), Some("hi"));
            assert_eq!(StreamChunk::done().as_text(), None);
        }
    }

    mod accumulator {
        use super::*;

        #[test]
        fn collects_text_chunks_in_order() {
            let mut acc = ChatAccumulator::new();
            acc.apply(&StreamChunk::text("Hel"));
            acc.apply(&StreamChunk::text("lo"));
            assert_eq!(acc.text(), "Hello");
            assert_eq!(acc.into_text(), "Hello");
        }

        #[test]
        fn ignores_non_text_chunks() {
            let mut acc = ChatAccumulator::new();
            acc.apply(&StreamChunk::text("hi"));
            acc.apply(&StreamChunk::done());
            acc.apply(&StreamChunk::error("boom"));
            assert_eq!(acc.text(), "hi");
        }
    }

    mod reconcile {
        use super::*;

        #[tokio::test]
        async fn emits_partials_then_final() {
            let history: SharedHistoryStore = Arc::new(InMemoryHistory::new());
            let chunks = chunk_stream(vec![
                Ok(StreamChunk::text("Hel")),
                Ok(StreamChunk::text("lo, ")),
                Ok(StreamChunk::text("world")),
                Ok(StreamChunk::done()),
            ]);

            let messages: Vec<ChatMessage> =
                reconcile(chunks, Arc::clone(&history), "greet me".into())
                    .collect()
                    .await;

            let partials: Vec<&ChatMessage> = messages.iter().filter(|m| m.streaming).collect();
            assert_eq!(
                partials.iter().map(|m| m.content.as_str()).collect::<Vec<_>>(),
                vec!["Hel", "Hello, ", "Hello, world"]
            );

            let last = messages.last().unwrap();
            assert_eq!(last, &ChatMessage::assistant("Hello, world"));
        }

        #[tokio::test]
        async fn streaming_flag_flips_exactly_once() {
            let history: SharedHistoryStore = Arc::new(InMemoryHistory::new());
            let chunks = chunk_stream(vec![
                Ok(StreamChunk::text("a")),
                Ok(StreamChunk::text("b")),
                Ok(StreamChunk::done()),
            ]);

            let messages: Vec<ChatMessage> =
                reconcile(chunks, history, "p".into()).collect().await;

            let terminal_count = messages.iter().filter(|m| m.is_terminal()).count();
            assert_eq!(terminal_count, 1);
            assert!(messages.last().unwrap().is_terminal());
            assert!(messages[..messages.len() - 1].iter().all(|m| m.streaming));
        }

        #[tokio::test]
        async fn final_content_is_appended_to_history() {
            let history = Arc::new(InMemoryHistory::new());
            let shared: SharedHistoryStore = Arc::clone(&history) as SharedHistoryStore;
            let chunks = chunk_stream(vec![
                Ok(StreamChunk::text("Hello, world")),
                Ok(StreamChunk::done()),
            ]);

            let _: Vec<ChatMessage> = reconcile(chunks, shared, "greet me".into()).collect().await;

            let entries = history.list(Capability::Chat).await.unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].request, "greet me");
            assert_eq!(entries[0].result, "Hello, world");
        }

        #[tokio::test]
        async fn transport_failure_emits_terminal_error() {
            let history = Arc::new(InMemoryHistory::new());
            let shared: SharedHistoryStore = Arc::clone(&history) as SharedHistoryStore;
            let chunks = chunk_stream(vec![
                Ok(StreamChunk::text("Hel")),
                Err(PipelineError::network("connection reset").into()),
            ]);

            let messages: Vec<ChatMessage> =
                reconcile(chunks, shared, "greet me".into()).collect().await;

            assert_eq!(messages[0], ChatMessage::partial("Hel"));
            assert_eq!(
                messages.last().unwrap(),
                &ChatMessage::error(STREAM_FAILURE_MESSAGE)
            );

            // Reconciled content is preserved, not rolled back.
            let entries = history.list(Capability::Chat).await.unwrap();
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].result, "Hel");
        }

        #[tokio::test]
        async fn error_chunk_before_any_text_appends_nothing() {
            let history = Arc::new(InMemoryHistory::new());
            let shared: SharedHistoryStore = Arc::clone(&history) as SharedHistoryStore;
            let chunks = chunk_stream(vec![Ok(StreamChunk::error("upstream failed"))]);

            let messages: Vec<ChatMessage> =
                reconcile(chunks, shared, "greet me".into()).collect().await;

            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].role, crate::chat::ChatRole::Error);
            assert!(history.list(Capability::Chat).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn dropping_the_stream_stops_consumption() {
            let history = Arc::new(InMemoryHistory::new());
            let shared: SharedHistoryStore = Arc::clone(&history) as SharedHistoryStore;
            let chunks = chunk_stream(vec![
                Ok(StreamChunk::text("Hel")),
                Ok(StreamChunk::text("lo")),
                Ok(StreamChunk::done()),
            ]);

            let mut stream = reconcile(chunks, shared, "greet me".into());
            let first = stream.next().await.unwrap();
            assert_eq!(first, ChatMessage::partial("Hel"));
            drop(stream);

            // The terminal append never ran.
            assert!(history.list(Capability::Chat).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn exhausted_stream_without_done_still_finalizes() {
            let history: SharedHistoryStore = Arc::new(InMemoryHistory::new());
            let chunks = chunk_stream(vec![Ok(StreamChunk::text("hi"))]);

            let messages: Vec<ChatMessage> =
                reconcile(chunks, history, "p".into()).collect().await;

            assert_eq!(messages.last().unwrap(), &ChatMessage::assistant("hi"));
        }
    }
}
