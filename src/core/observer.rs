//! Scheduler notifications.
//!
//! The four notification slots are methods of one trait, each a no-op by
//! default. An observer is injected at construction and may be swapped at
//! runtime through `UploadScheduler::update_config`.

use std::sync::Arc;

use super::task::{QueueStatus, UploadReceipt};
use crate::util::ids::TaskId;

/// Receiver of scheduler lifecycle notifications.
///
/// Callbacks run with the scheduler's internal lock released, so they may call
/// back into the scheduler (for example to re-enqueue a failed task). They
/// should return quickly; they run on the task that produced the event.
pub trait UploadObserver: Send + Sync {
    /// Progress of an uploading task changed. Non-decreasing per task.
    fn on_progress(&self, _id: &TaskId, _percent: u8) {}

    /// A transfer resolved.
    fn on_success(&self, _id: &TaskId, _receipt: &UploadReceipt) {}

    /// A transfer failed with a human-readable message.
    fn on_error(&self, _id: &TaskId, _message: &str) {}

    /// Queue depth changed after an enqueue, admission, clear or completion.
    fn on_queue_update(&self, _status: QueueStatus) {}
}

impl<O> UploadObserver for Arc<O>
where
    O: UploadObserver + ?Sized,
{
    fn on_progress(&self, id: &TaskId, percent: u8) {
        (**self).on_progress(id, percent);
    }

    fn on_success(&self, id: &TaskId, receipt: &UploadReceipt) {
        (**self).on_success(id, receipt);
    }

    fn on_error(&self, id: &TaskId, message: &str) {
        (**self).on_error(id, message);
    }

    fn on_queue_update(&self, status: QueueStatus) {
        (**self).on_queue_update(status);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl UploadObserver for NoopObserver {}

/// Observer that logs every notification through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl UploadObserver for TracingObserver {
    fn on_progress(&self, id: &TaskId, percent: u8) {
        tracing::debug!(task = %id, percent, "upload progress");
    }

    fn on_success(&self, id: &TaskId, receipt: &UploadReceipt) {
        tracing::info!(task = %id, url = %receipt.url, public_id = %receipt.public_id, "upload successful");
    }

    fn on_error(&self, id: &TaskId, message: &str) {
        tracing::error!(task = %id, error = message, "upload error");
    }

    fn on_queue_update(&self, status: QueueStatus) {
        tracing::debug!(
            pending = status.pending_len,
            active = status.active_count,
            "queue update"
        );
    }
}

/// Fans notifications out to several observers in registration order.
#[derive(Clone, Default)]
pub struct ObserverSet {
    observers: Vec<Arc<dyn UploadObserver>>,
}

impl ObserverSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an observer at the end of the dispatch order.
    #[must_use]
    pub fn with(mut self, observer: impl UploadObserver + 'static) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl UploadObserver for ObserverSet {
    fn on_progress(&self, id: &TaskId, percent: u8) {
        for observer in &self.observers {
            observer.on_progress(id, percent);
        }
    }

    fn on_success(&self, id: &TaskId, receipt: &UploadReceipt) {
        for observer in &self.observers {
            observer.on_success(id, receipt);
        }
    }

    fn on_error(&self, id: &TaskId, message: &str) {
        for observer in &self.observers {
            observer.on_error(id, message);
        }
    }

    fn on_queue_update(&self, status: QueueStatus) {
        for observer in &self.observers {
            observer.on_queue_update(status);
        }
    }
}
