//! Tests for file validation

use upload_scheduler::uploader::{
    validate_file, ImageFile, ValidationError, ACCEPTED_FILE_TYPES, MAX_FILE_SIZE,
};

fn image(name: &str, content_type: &str, size: u64) -> ImageFile {
    ImageFile::new(format!("/uploads/{name}"), name, content_type, size)
}

#[test]
fn test_accepted_types() {
    assert_eq!(ACCEPTED_FILE_TYPES.len(), 5);
    assert!(ACCEPTED_FILE_TYPES.contains(&"image/webp"));
    assert!(!ACCEPTED_FILE_TYPES.contains(&"image/svg+xml"));
}

#[test]
fn test_invalid_type_message() {
    let err = validate_file(&image("doc.pdf", "application/pdf", 10)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "doc.pdf: Invalid file type. Only JPG, JPEG, PNG, GIF, and WEBP are allowed."
    );
}

#[test]
fn test_too_large_message() {
    let size = MAX_FILE_SIZE + MAX_FILE_SIZE / 2;
    let err = validate_file(&image("big.png", "image/png", size)).unwrap_err();
    assert!(matches!(err, ValidationError::TooLarge { .. }));
    assert_eq!(
        err.to_string(),
        "big.png: File size exceeds 5MB limit. Current size: 7.50MB"
    );
}

#[test]
fn test_valid_file() {
    assert!(validate_file(&image("ok.gif", "image/gif", MAX_FILE_SIZE)).is_ok());
}
