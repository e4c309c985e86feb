//! # Upload Scheduler
//!
//! A bounded-concurrency upload queue with per-task lifecycle tracking and
//! progress notifications.
//!
//! Callers hand the scheduler batches of `{id, handle}` requests. Requests wait
//! in a FIFO queue and are admitted greedily while fewer than `max_concurrent`
//! transfers are in flight. Each admitted task is driven through
//! `queued -> uploading -> success | error` by an abstract [`core::Transfer`]
//! capability, and every step is reported to an [`core::UploadObserver`].
//!
//! ## Key Features
//!
//! - **Concurrency cap**: at most `max_concurrent` transfers at any instant
//! - **Strict FIFO admission**: no priorities, no starvation
//! - **Failure isolation**: a failed transfer only affects its own task
//! - **Runtime reconfiguration**: limit and observer can change while uploads run
//! - **Caller-side retry**: a failed task is retried by enqueuing it again
//! - **Cloudinary backend**: multipart HTTP transfer with byte-level progress
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use upload_scheduler::builders::SchedulerBuilder;
//! use upload_scheduler::config::CloudinaryConfig;
//! use upload_scheduler::infra::CloudinaryTransfer;
//! use upload_scheduler::runtime::TokioSpawner;
//! use upload_scheduler::uploader::{ImageFile, UploadBoard};
//!
//! let board = Arc::new(UploadBoard::new());
//! let scheduler = SchedulerBuilder::default()
//!     .max_concurrent(4)
//!     .observer(Arc::clone(&board))
//!     .build(
//!         CloudinaryTransfer::new(CloudinaryConfig::from_env()?),
//!         TokioSpawner::current()?,
//!     )?;
//!
//! board.select_files([ImageFile::from_path("cat.png")?]);
//! board.upload_pending(&scheduler);
//! ```
//!
//! For complete scenarios, see `tests/scheduler_algorithm_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: task model, queue, transfer, observers.
pub mod core;
/// Configuration models for the scheduler and transfer backends.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Transfer backends.
#[cfg(feature = "cloudinary")]
pub mod infra;
/// Runtime adapters.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Caller-side file intake, validation and upload board.
pub mod uploader;
/// Shared utilities.
pub mod util;
