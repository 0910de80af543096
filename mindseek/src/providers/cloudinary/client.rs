//! Cloudinary API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::credentials::CredentialSource;
use crate::error::{PipelineError, Result};

use super::config::CloudinaryConfig;

/// Cloudinary error response.
#[derive(Debug, Clone, Deserialize)]
struct CloudinaryErrorResponse {
    pub error: CloudinaryError,
}

/// Cloudinary error details.
#[derive(Debug, Clone, Deserialize)]
struct CloudinaryError {
    pub message: String,
}

/// Cloudinary upload client.
///
/// Uploads are authenticated per request with a signature over the
/// upload parameters rather than an authorization header.
#[derive(Debug, Clone)]
pub struct Cloudinary {
    pub(crate) config: Arc<CloudinaryConfig>,
    pub(crate) client: Client,
}

impl Cloudinary {
    /// Create a new Cloudinary client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any credential is empty or the HTTP client
    /// cannot be built.
    pub fn new(config: CloudinaryConfig) -> Result<Self> {
        if config.cloud_name.is_empty() || config.api_key.is_empty() || config.api_secret.is_empty()
        {
            return Err(PipelineError::config("Cloudinary credentials are required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| PipelineError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any `CLOUDINARY_*` variable is not set.
    pub fn from_env() -> Result<Self> {
        Self::new(CloudinaryConfig::from_env()?)
    }

    /// Create a client reading credentials from the given source.
    ///
    /// # Errors
    ///
    /// Returns an error if a required credential is missing from the source.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        Self::new(CloudinaryConfig::from_source(source)?)
    }

    /// Get the account cloud name.
    #[must_use]
    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }

    /// Build the image upload URL.
    pub(crate) fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.config.base_url, self.config.cloud_name
        )
    }

    /// Build a request for a multipart upload.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.post(url)
    }

    /// Sign upload parameters.
    ///
    /// Cloudinary expects a hex digest over the `key=value` pairs sorted
    /// by key and joined with `&`, with the API secret appended.
    pub(crate) fn sign_params(&self, params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<_> = params.to_vec();
        sorted.sort_by_key(|&(key, _)| key);

        let joined = sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Parse an error response from Cloudinary.
    ///
    /// Everything that goes wrong on this leg is a storage failure.
    pub(crate) fn parse_error(status: u16, body: &str) -> PipelineError {
        if let Ok(response) = serde_json::from_str::<CloudinaryErrorResponse>(body) {
            return PipelineError::storage("cloudinary", response.error.message);
        }

        PipelineError::provider_status("cloudinary", status, body).into_storage()
    }
}
