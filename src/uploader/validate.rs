//! Client-side checks applied before a file ever reaches the scheduler.

use thiserror::Error;

use super::file::ImageFile;

/// Content types the uploader accepts.
pub const ACCEPTED_FILE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Largest accepted file, in bytes (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Why a file was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Content type not in [`ACCEPTED_FILE_TYPES`].
    #[error("{name}: Invalid file type. Only JPG, JPEG, PNG, GIF, and WEBP are allowed.")]
    InvalidType {
        /// File name.
        name: String,
        /// Offending content type.
        content_type: String,
    },
    /// Larger than [`MAX_FILE_SIZE`].
    #[error("{name}: File size exceeds 5MB limit. Current size: {size_mb:.2}MB")]
    TooLarge {
        /// File name.
        name: String,
        /// Actual size in MiB.
        size_mb: f64,
    },
}

/// Check type first, then size.
///
/// # Errors
///
/// The first rule the file breaks.
pub fn validate_file(file: &ImageFile) -> Result<(), ValidationError> {
    if !ACCEPTED_FILE_TYPES.contains(&file.content_type.as_str()) {
        return Err(ValidationError::InvalidType {
            name: file.name.clone(),
            content_type: file.content_type.clone(),
        });
    }
    if file.size > MAX_FILE_SIZE {
        #[allow(clippy::cast_precision_loss)]
        let size_mb = file.size as f64 / (1024.0 * 1024.0);
        return Err(ValidationError::TooLarge {
            name: file.name.clone(),
            size_mb,
        });
    }
    Ok(())
}
