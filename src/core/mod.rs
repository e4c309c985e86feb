//! Core scheduling abstractions: task model, queue, transfer capability,
//! observers and the scheduler itself.

pub mod error;
pub mod observer;
pub mod queue;
pub mod scheduler;
pub mod task;
pub mod transfer;

pub use error::{AppResult, SchedulerError, TransferError};
pub use observer::{NoopObserver, ObserverSet, TracingObserver, UploadObserver};
pub use queue::{PendingQueue, PendingTask};
pub use scheduler::{ConfigUpdate, Spawn, UploadScheduler};
pub use task::{QueueStatus, TaskStatus, UploadReceipt, UploadRequest, UploadTask};
pub use transfer::{ProgressReporter, Transfer};
