//! DeepSeek ChatProvider implementation.

use async_trait::async_trait;
use futures::StreamExt;

use crate::chat::{ChatProvider, ChatRequest};
use crate::error::{PipelineError, Result};
use crate::stream::{ChunkStream, StreamChunk};

use super::client::DeepSeek;
use super::stream::parse_sse_events;

#[async_trait]
impl ChatProvider for DeepSeek {
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        let url = self.chat_url();
        let body = self.build_body(request);

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let stream = response.bytes_stream();
        let parsed_stream = stream.flat_map(move |chunk_result| {
            let chunks: Vec<Result<StreamChunk>> = match chunk_result {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    parse_sse_events(&text)
                }
                Err(e) => vec![Err(PipelineError::network(e.to_string()).into())],
            };
            futures::stream::iter(chunks)
        });

        Ok(Box::pin(parsed_stream))
    }

    fn provider_name(&self) -> &'static str {
        "deepseek"
    }
}
