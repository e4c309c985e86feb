//! Transfer backends.

pub mod cloudinary;

pub use cloudinary::CloudinaryTransfer;
