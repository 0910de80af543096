//! Image generation and storage types with their provider traits.
//!
//! Image generation is a two-stage chain: a generation provider produces
//! raw bytes, then a storage provider uploads them and hosts them by URL.
//! The raw bytes never leave the pipeline; callers only see the hosted
//! [`StoredImage`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raw image bytes from the generation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Raw encoded image bytes.
    pub bytes: Vec<u8>,
    /// MIME type of the encoding.
    pub mime_type: String,
}

impl GeneratedImage {
    /// Create a generated image.
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Create a PNG image.
    #[must_use]
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(bytes, "image/png")
    }
}

/// Metadata attached to a stored image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// The prompt that produced the image.
    pub prompt: String,
    /// The generating model name.
    pub model: String,
    /// When the image was generated.
    pub generated_at: DateTime<Utc>,
}

impl ImageMetadata {
    /// Create metadata stamped with the current time.
    #[must_use]
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            generated_at: Utc::now(),
        }
    }
}

/// Raw upload response as a storage provider returns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUpload {
    /// Hosted HTTPS URL of the stored image.
    pub secure_url: Option<String>,
    /// Provider-assigned identifier.
    pub public_id: Option<String>,
}

/// A stored image surfaced to callers.
///
/// The URL is only ever populated after the storage stage succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// Hosted HTTPS URL of the image.
    pub image_url: String,
    /// Provider-assigned identifier of the stored image.
    pub image_id: String,
}

/// A provider that generates images from text prompts.
#[async_trait]
pub trait ImageGenerationProvider: Send + Sync {
    /// Generate an image for a prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the prompt or cannot be
    /// reached.
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage>;

    /// Identifier of the generating model, recorded in upload metadata.
    fn model_name(&self) -> String {
        "unknown".to_owned()
    }
}

/// A provider that stores generated images and hosts them by URL.
#[async_trait]
pub trait ImageStorageProvider: Send + Sync {
    /// Upload image bytes with their metadata.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the upload is rejected or the provider
    /// cannot be reached.
    async fn upload(&self, image: &GeneratedImage, metadata: &ImageMetadata) -> Result<RawUpload>;
}

/// Shared reference to an image generation provider.
pub type SharedImageGenerationProvider = std::sync::Arc<dyn ImageGenerationProvider>;

/// Shared reference to an image storage provider.
pub type SharedImageStorageProvider = std::sync::Arc<dyn ImageStorageProvider>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn png_sets_mime_type() {
        let image = GeneratedImage::png(vec![0x89, 0x50]);
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn metadata_carries_prompt_and_model() {
        let metadata = ImageMetadata::new("a red fox", "FLUX.1-dev");
        assert_eq!(metadata.prompt, "a red fox");
        assert_eq!(metadata.model, "FLUX.1-dev");
        assert!(metadata.generated_at <= Utc::now());
    }

    #[test]
    fn raw_upload_tolerates_missing_fields() {
        let raw: RawUpload = serde_json::from_str("{}").unwrap();
        assert!(raw.secure_url.is_none());
        assert!(raw.public_id.is_none());
    }

    #[test]
    fn raw_upload_reads_upload_response() {
        let json = r#"{
            "secure_url": "https://res.cloudinary.com/demo/image/upload/flux-1.png",
            "public_id": "flux-generations/flux-1",
            "bytes": 14021
        }"#;
        let raw: RawUpload = serde_json::from_str(json).unwrap();
        assert_eq!(raw.public_id.as_deref(), Some("flux-generations/flux-1"));
    }
}
