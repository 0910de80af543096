//! Cloudinary client configuration.

use crate::credentials::{self, CredentialSource, EnvCredentials};
use crate::error::Result;

/// Configuration for the Cloudinary upload client.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    /// Account cloud name, part of the upload URL.
    pub cloud_name: String,
    /// API key sent with each signed upload.
    pub api_key: String,
    /// API secret used to sign upload parameters.
    pub api_secret: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Folder uploads are stored under.
    pub folder: String,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

impl CloudinaryConfig {
    /// Default base URL for the Cloudinary API.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.cloudinary.com/v1_1";

    /// Default upload folder.
    pub const DEFAULT_FOLDER: &'static str = "flux-generations";

    /// Credential name holding the cloud name.
    pub const ENV_CLOUD_NAME: &'static str = "CLOUDINARY_CLOUD_NAME";

    /// Credential name holding the API key.
    pub const ENV_API_KEY: &'static str = "CLOUDINARY_API_KEY";

    /// Credential name holding the API secret.
    pub const ENV_API_SECRET: &'static str = "CLOUDINARY_API_SECRET";

    /// Create a new configuration with the given account credentials.
    #[must_use]
    pub fn new(
        cloud_name: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: Self::DEFAULT_BASE_URL.to_owned(),
            folder: Self::DEFAULT_FOLDER.to_owned(),
            timeout_secs: Some(120),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `CLOUDINARY_CLOUD_NAME` (required)
    /// - `CLOUDINARY_API_KEY` (required)
    /// - `CLOUDINARY_API_SECRET` (required)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the three variables is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&EnvCredentials::new())
    }

    /// Create configuration from a credential source.
    ///
    /// # Errors
    ///
    /// Returns an error if any required credential is missing from the source.
    pub fn from_source(source: &dyn CredentialSource) -> Result<Self> {
        let cloud_name = credentials::require(source, Self::ENV_CLOUD_NAME)?;
        let api_key = credentials::require(source, Self::ENV_API_KEY)?;
        let api_secret = credentials::require(source, Self::ENV_API_SECRET)?;

        Ok(Self::new(cloud_name, api_key, api_secret))
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the upload folder.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self::new(String::new(), String::new(), String::new())
    }
}
