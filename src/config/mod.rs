//! Configuration models for the scheduler and the HTTP transfer backend.

pub mod cloudinary;
pub mod scheduler;

pub use cloudinary::CloudinaryConfig;
pub use scheduler::{SchedulerConfig, DEFAULT_MAX_CONCURRENT};
