//! Hugging Face text-to-image implementation.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::image::{GeneratedImage, ImageGenerationProvider};

use super::client::HuggingFace;

/// Hugging Face text-to-image request.
#[derive(Debug, Clone, Serialize)]
struct HuggingFaceImageRequest {
    pub inputs: String,
}

#[async_trait]
impl ImageGenerationProvider for HuggingFace {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        let url = self.model_url();
        let body = HuggingFaceImageRequest {
            inputs: prompt.to_owned(),
        };

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let bytes = response.bytes().await?.to_vec();

        Ok(GeneratedImage::png(bytes))
    }

    fn model_name(&self) -> String {
        self.config.model.clone()
    }
}
