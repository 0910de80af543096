//! DeepSeek SSE stream parsing.

use serde::Deserialize;

use crate::error::Result;
use crate::stream::StreamChunk;

/// DeepSeek stream chunk (OpenAI-compatible wire format).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeepSeekStreamChunk {
    pub choices: Vec<DeepSeekStreamChoice>,
}

/// DeepSeek stream choice.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DeepSeekStreamChoice {
    pub delta: DeepSeekStreamDelta,
}

/// DeepSeek stream delta.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DeepSeekStreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// Parse SSE events from a text buffer.
pub(crate) fn parse_sse_events(text: &str) -> Vec<Result<StreamChunk>> {
    let mut results = Vec::new();

    for line in text.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with(':') {
            continue;
        }

        if let Some(data) = line.strip_prefix("data: ") {
            let data = data.trim();

            // Handle stream end
            if data == "[DONE]" {
                results.push(Ok(StreamChunk::done()));
                continue;
            }

            match serde_json::from_str::<DeepSeekStreamChunk>(data) {
                Ok(chunk) => {
                    for choice in &chunk.choices {
                        if let Some(content) = &choice.delta.content
                            && !content.is_empty()
                        {
                            results.push(Ok(StreamChunk::text(content)));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse SSE chunk: {e}, data: {data}");
                }
            }
        }
    }

    results
}
