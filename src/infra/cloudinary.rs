//! Cloudinary unsigned upload over HTTP multipart.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use serde::Deserialize;

use crate::config::CloudinaryConfig;
use crate::core::{ProgressReporter, Transfer, TransferError, UploadReceipt};
use crate::uploader::ImageFile;

/// Bytes handed to the HTTP body per chunk; progress is reported per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

/// Uploads [`ImageFile`]s to Cloudinary with an unsigned preset.
#[derive(Debug, Clone)]
pub struct CloudinaryTransfer {
    client: reqwest::Client,
    config: CloudinaryConfig,
    chunk_size: usize,
}

impl CloudinaryTransfer {
    /// Transfer using a fresh HTTP client.
    pub fn new(config: CloudinaryConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Transfer sharing an existing HTTP client.
    pub const fn with_client(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self {
            client,
            config,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Override the body chunk size (minimum 1 byte).
    #[must_use]
    pub fn chunk_size(mut self, bytes: usize) -> Self {
        self.chunk_size = bytes.max(1);
        self
    }

    /// Settings in use.
    pub const fn config(&self) -> &CloudinaryConfig {
        &self.config
    }

    fn file_part(
        &self,
        file: &ImageFile,
        bytes: Vec<u8>,
        progress: ProgressReporter,
    ) -> Result<Part, TransferError> {
        let total = bytes.len() as u64;
        let chunks: Vec<Vec<u8>> = bytes.chunks(self.chunk_size).map(<[u8]>::to_vec).collect();
        let mut sent = 0u64;
        let body = stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            progress.report_bytes(sent, total);
            Ok::<_, std::io::Error>(chunk)
        });

        Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| TransferError::Other(format!("invalid content type: {e}")))
    }
}

#[async_trait]
impl Transfer<ImageFile> for CloudinaryTransfer {
    async fn transfer(
        &self,
        file: ImageFile,
        progress: ProgressReporter,
    ) -> Result<UploadReceipt, TransferError> {
        let bytes = tokio::fs::read(&file.path).await?;
        tracing::debug!(file = %file.name, bytes = bytes.len(), "uploading to cloudinary");

        let form = Form::new()
            .part("file", self.file_part(&file, bytes, progress)?)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", self.config.folder.clone());

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransferError::Network(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(TransferError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .await
            .map_err(|e| TransferError::Network(e.to_string()))?;
        parse_upload_response(&body)
    }
}

/// Extract the receipt from a successful upload response body.
///
/// # Errors
///
/// [`TransferError::MalformedResponse`] if the body is not the expected JSON.
pub fn parse_upload_response(body: &str) -> Result<UploadReceipt, TransferError> {
    let parsed: UploadResponse =
        serde_json::from_str(body).map_err(|e| TransferError::MalformedResponse(e.to_string()))?;
    Ok(UploadReceipt::new(parsed.secure_url, parsed.public_id))
}
