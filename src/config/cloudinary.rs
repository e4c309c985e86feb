//! Settings for the Cloudinary unsigned-upload backend.
//!
//! Values come from the process environment, with `.env` support via `dotenvy`.

use serde::{Deserialize, Serialize};

use crate::core::SchedulerError;

/// Environment key holding the cloud name.
pub const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
/// Environment key holding the unsigned upload preset.
pub const ENV_UPLOAD_PRESET: &str = "CLOUDINARY_UPLOAD_PRESET";
/// Environment key overriding the destination folder.
pub const ENV_FOLDER: &str = "CLOUDINARY_FOLDER";
/// Environment key overriding the API origin.
pub const ENV_API_BASE: &str = "CLOUDINARY_API_BASE";

/// Folder uploads land in unless overridden.
pub const DEFAULT_FOLDER: &str = "image-uploader";
/// Public API origin.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Cloudinary upload settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    /// Account cloud name.
    pub cloud_name: String,
    /// Unsigned upload preset.
    pub upload_preset: String,
    /// Destination folder.
    pub folder: String,
    /// API origin, without trailing slash.
    pub api_base: String,
}

impl CloudinaryConfig {
    /// Settings for `cloud_name` / `upload_preset` with default folder and origin.
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            upload_preset: upload_preset.into(),
            folder: DEFAULT_FOLDER.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Load from the environment, reading a `.env` file first if one exists.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Config`] when the cloud name or upload preset is missing.
    pub fn from_env() -> Result<Self, SchedulerError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "failed to read .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source. Blank values count as missing.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Config`] when the cloud name or upload preset is missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SchedulerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let (Some(cloud_name), Some(upload_preset)) = (get(ENV_CLOUD_NAME), get(ENV_UPLOAD_PRESET))
        else {
            return Err(SchedulerError::Config(format!(
                "Cloudinary credentials are missing. Please set {ENV_CLOUD_NAME} and {ENV_UPLOAD_PRESET}"
            )));
        };

        let mut cfg = Self::new(cloud_name, upload_preset);
        if let Some(folder) = get(ENV_FOLDER) {
            cfg.folder = folder;
        }
        if let Some(api_base) = get(ENV_API_BASE) {
            cfg.api_base = api_base.trim_end_matches('/').to_string();
        }
        Ok(cfg)
    }

    /// Endpoint receiving image uploads.
    pub fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.api_base, self.cloud_name)
    }
}
