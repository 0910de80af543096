//! Cloudinary signed image upload implementation.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{SecondsFormat, Utc};

use crate::error::{PipelineError, Result};
use crate::image::{GeneratedImage, ImageMetadata, ImageStorageProvider, RawUpload};

use super::client::Cloudinary;

#[async_trait]
impl ImageStorageProvider for Cloudinary {
    async fn upload(&self, image: &GeneratedImage, metadata: &ImageMetadata) -> Result<RawUpload> {
        let url = self.upload_url();

        let data_uri = format!(
            "data:{};base64,{}",
            image.mime_type,
            BASE64.encode(&image.bytes)
        );

        let now = Utc::now();
        let timestamp = now.timestamp().to_string();
        let public_id = format!("flux-{}", now.timestamp_millis());
        let context = format!(
            "prompt={}|model={}|generated_at={}",
            metadata.prompt,
            metadata.model,
            metadata
                .generated_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );

        let signature = self.sign_params(&[
            ("context", &context),
            ("folder", &self.config.folder),
            ("public_id", &public_id),
            ("timestamp", &timestamp),
        ]);

        let form = reqwest::multipart::Form::new()
            .text("file", data_uri)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("folder", self.config.folder.clone())
            .text("public_id", public_id)
            .text("context", context);

        let response = self
            .build_request(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::from(e).into_storage())?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| PipelineError::from(e).into_storage())?;
        let upload: RawUpload = serde_json::from_str(&response_text).map_err(|e| {
            PipelineError::storage("cloudinary", format!("Unexpected upload response: {e}"))
        })?;

        Ok(upload)
    }
}
