//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by the scheduler's configuration surface.
///
/// Transfer failures never surface here; they are converted into task state
/// and an `on_error` notification.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Concurrency limit outside the accepted range.
    #[error("invalid concurrency limit: {0}")]
    InvalidConcurrency(usize),
    /// Configuration could not be loaded or failed validation.
    #[error("config error: {0}")]
    Config(String),
}

/// Failure of a single transfer. The `Display` text is what observers receive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The request never produced an HTTP response.
    #[error("Network error during upload: {0}")]
    Network(String),
    /// The remote service answered with a non-success status.
    #[error("Upload failed with status: {0}")]
    Status(u16),
    /// The remote service answered, but the body was not understood.
    #[error("Failed to parse upload response: {0}")]
    MalformedResponse(String),
    /// The transfer was aborted before completion.
    #[error("Upload was aborted")]
    Aborted,
    /// The file behind the handle could not be read.
    #[error("Failed to read file: {0}")]
    Io(String),
    /// Any other failure, reported verbatim.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
