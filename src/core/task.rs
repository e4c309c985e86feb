//! Upload task model and lifecycle transitions.

use serde::{Deserialize, Serialize};

use crate::util::ids::TaskId;

/// Lifecycle state of an upload task.
///
/// `Queued -> Uploading -> {Success | Error}`; the last two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting in the pending queue.
    Queued,
    /// Admitted; the transfer is in flight.
    Uploading,
    /// Transfer resolved.
    Success,
    /// Transfer rejected.
    Error,
}

impl TaskStatus {
    /// Whether no further transitions can happen.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Location identifiers returned by a successful transfer, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Public URL of the stored asset.
    pub url: String,
    /// Storage-side identifier of the asset.
    pub public_id: String,
}

impl UploadReceipt {
    /// Build a receipt from its two parts.
    pub fn new(url: impl Into<String>, public_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            public_id: public_id.into(),
        }
    }
}

/// What the caller hands to `enqueue`: an id and an opaque file handle.
#[derive(Debug, Clone)]
pub struct UploadRequest<H> {
    /// Caller-assigned identifier, unique among in-flight tasks.
    pub id: TaskId,
    /// Reference to the file's bytes; never inspected by the scheduler.
    pub handle: H,
}

impl<H> UploadRequest<H> {
    /// Pair an id with a handle.
    pub fn new(id: impl Into<TaskId>, handle: H) -> Self {
        Self {
            id: id.into(),
            handle,
        }
    }
}

/// One file's journey through the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTask {
    /// Correlation key used in every notification.
    pub id: TaskId,
    /// Current lifecycle state.
    pub status: TaskStatus,
    /// Percentage in `0..=100`, non-decreasing while uploading.
    pub progress: u8,
    /// Set on success.
    pub result: Option<UploadReceipt>,
    /// Set on error.
    pub last_error: Option<String>,
}

impl UploadTask {
    /// A freshly enqueued task.
    pub fn queued(id: TaskId) -> Self {
        Self {
            id,
            status: TaskStatus::Queued,
            progress: 0,
            result: None,
            last_error: None,
        }
    }

    pub(crate) fn start(&mut self) {
        self.status = TaskStatus::Uploading;
    }

    /// Apply a progress report. Returns `false` when the report must not be
    /// re-emitted: the task is not uploading, or the value would go backwards.
    pub(crate) fn record_progress(&mut self, percent: u8) -> bool {
        if self.status != TaskStatus::Uploading {
            return false;
        }
        let percent = percent.min(100);
        if percent < self.progress {
            return false;
        }
        self.progress = percent;
        true
    }

    pub(crate) fn succeed(&mut self, receipt: UploadReceipt) {
        self.status = TaskStatus::Success;
        self.progress = 100;
        self.result = Some(receipt);
    }

    // progress is left at the last observed value
    pub(crate) fn fail(&mut self, message: String) {
        self.status = TaskStatus::Error;
        self.last_error = Some(message);
    }
}

/// Snapshot of queue depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Tasks enqueued but not yet admitted.
    pub pending_len: usize,
    /// Tasks admitted and not yet settled.
    pub active_count: usize,
}

impl QueueStatus {
    /// Build a snapshot.
    pub const fn new(pending_len: usize, active_count: usize) -> Self {
        Self {
            pending_len,
            active_count,
        }
    }

    /// Whether anything is still queued or in flight.
    pub const fn is_processing(&self) -> bool {
        self.pending_len > 0 || self.active_count > 0
    }
}
