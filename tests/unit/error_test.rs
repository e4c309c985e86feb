//! Tests for error types

use upload_scheduler::core::{SchedulerError, TransferError};

#[test]
fn test_invalid_concurrency_error() {
    let err = SchedulerError::InvalidConcurrency(0);
    assert_eq!(format!("{}", err), "invalid concurrency limit: 0");
}

#[test]
fn test_config_error() {
    let err = SchedulerError::Config("missing preset".to_string());
    assert_eq!(format!("{}", err), "config error: missing preset");
}

#[test]
fn test_status_error_message() {
    assert_eq!(
        TransferError::Status(413).to_string(),
        "Upload failed with status: 413"
    );
}

#[test]
fn test_network_error_message() {
    let err = TransferError::Network("connection reset".to_string());
    assert_eq!(err.to_string(), "Network error during upload: connection reset");
}

#[test]
fn test_other_error_is_verbatim() {
    let err = TransferError::Other("quota exhausted".to_string());
    assert_eq!(err.to_string(), "quota exhausted");
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err: TransferError = io.into();
    assert!(matches!(err, TransferError::Io(_)));
    assert_eq!(err.to_string(), "Failed to read file: no such file");
}
