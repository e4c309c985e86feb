//! Caller-side collaborators: file handles, validation and the upload board
//! that turns scheduler notifications into per-file display state.

pub mod board;
pub mod file;
pub mod validate;

pub use board::{BoardEntry, EntryStatus, UploadBoard};
pub use file::ImageFile;
pub use validate::{validate_file, ValidationError, ACCEPTED_FILE_TYPES, MAX_FILE_SIZE};
