//! Per-file upload state as the caller sees it.
//!
//! The board registers files, hands them to a scheduler and folds the
//! scheduler's notifications back into one entry per file. It also owns the
//! retry policy: a failed entry is retried by enqueuing it again under the
//! same id.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::file::ImageFile;
use super::validate::validate_file;
use crate::core::{QueueStatus, Spawn, UploadObserver, UploadReceipt, UploadRequest, UploadScheduler};
use crate::util::ids::TaskId;

/// Display state of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// Registered, not yet handed to the scheduler.
    Pending,
    /// Handed to the scheduler, no progress seen yet.
    Queued,
    /// Progress notifications are arriving.
    Uploading,
    /// Upload finished.
    Success,
    /// Upload failed; eligible for retry.
    Error,
}

/// One tracked file.
#[derive(Debug, Clone)]
pub struct BoardEntry<H> {
    /// Task id used with the scheduler.
    pub id: TaskId,
    /// Handle re-sent on retry.
    pub handle: H,
    /// Display state.
    pub status: EntryStatus,
    /// Last known percentage.
    pub progress: u8,
    /// Location of the stored asset once uploaded.
    pub receipt: Option<UploadReceipt>,
    /// Failure message of the last attempt.
    pub error: Option<String>,
}

impl<H> BoardEntry<H> {
    fn pending(id: TaskId, handle: H) -> Self {
        Self {
            id,
            handle,
            status: EntryStatus::Pending,
            progress: 0,
            receipt: None,
            error: None,
        }
    }
}

struct BoardState<H> {
    entries: Vec<BoardEntry<H>>,
    errors: Vec<String>,
    queue: QueueStatus,
}

/// Caller-side view of every selected file. Share it as `Arc<UploadBoard<_>>`
/// and attach that as (one of) the scheduler's observers.
pub struct UploadBoard<H> {
    state: Mutex<BoardState<H>>,
}

impl<H> Default for UploadBoard<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> UploadBoard<H> {
    /// Empty board.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BoardState {
                entries: Vec::new(),
                errors: Vec::new(),
                queue: QueueStatus::new(0, 0),
            }),
        }
    }

    /// Register a file as pending under `id`. Does not enqueue it.
    pub fn track(&self, id: impl Into<TaskId>, handle: H) {
        self.state
            .lock()
            .entries
            .push(BoardEntry::pending(id.into(), handle));
    }

    /// Forget an entry, returning it. An in-flight upload is not cancelled;
    /// its later notifications are simply ignored.
    pub fn remove(&self, id: &TaskId) -> Option<BoardEntry<H>> {
        let mut state = self.state.lock();
        let index = state.entries.iter().position(|e| &e.id == id)?;
        Some(state.entries.remove(index))
    }

    /// Forget every entry and validation message.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.errors.clear();
    }

    /// Drop one validation message by position.
    pub fn dismiss_error(&self, index: usize) -> Option<String> {
        let mut state = self.state.lock();
        (index < state.errors.len()).then(|| state.errors.remove(index))
    }

    /// Validation messages from the last selection.
    pub fn errors(&self) -> Vec<String> {
        self.state.lock().errors.clone()
    }

    /// Queue depth from the most recent scheduler notification.
    pub fn queue_status(&self) -> QueueStatus {
        self.state.lock().queue
    }

    /// Number of tracked files.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.state.lock().entries.is_empty()
    }

    /// Number of entries in `status`.
    pub fn count(&self, status: EntryStatus) -> usize {
        self.state
            .lock()
            .entries
            .iter()
            .filter(|e| e.status == status)
            .count()
    }

    /// Number of entries currently receiving progress.
    pub fn uploading_count(&self) -> usize {
        self.count(EntryStatus::Uploading)
    }

    /// Mean progress over all entries, 0 when empty.
    pub fn overall_progress(&self) -> f64 {
        let state = self.state.lock();
        if state.entries.is_empty() {
            return 0.0;
        }
        let total: u32 = state.entries.iter().map(|e| u32::from(e.progress)).sum();
        f64::from(total) / f64::from(u32::try_from(state.entries.len()).unwrap_or(u32::MAX))
    }

    fn update(&self, id: &TaskId, apply: impl FnOnce(&mut BoardEntry<H>)) {
        let mut state = self.state.lock();
        match state.entries.iter_mut().find(|e| &e.id == id) {
            Some(entry) => apply(entry),
            None => tracing::debug!(task = %id, "notification for untracked entry"),
        }
    }
}

impl<H: Clone> UploadBoard<H> {
    /// Snapshot of every entry in registration order.
    pub fn entries(&self) -> Vec<BoardEntry<H>> {
        self.state.lock().entries.clone()
    }

    /// Snapshot of one entry.
    pub fn entry(&self, id: &TaskId) -> Option<BoardEntry<H>> {
        self.state
            .lock()
            .entries
            .iter()
            .find(|e| &e.id == id)
            .cloned()
    }

    /// Enqueue every pending entry, in registration order, and mark them
    /// queued. Returns how many.
    pub fn upload_pending<S>(&self, scheduler: &UploadScheduler<H, S>) -> usize
    where
        H: Send + 'static,
        S: Spawn + Send + Sync + 'static,
    {
        let requests: Vec<_> = self
            .state
            .lock()
            .entries
            .iter_mut()
            .filter(|e| e.status == EntryStatus::Pending)
            .map(|e| {
                e.status = EntryStatus::Queued;
                UploadRequest::new(e.id.clone(), e.handle.clone())
            })
            .collect();
        let count = requests.len();
        // lock released: enqueue notifies this board synchronously
        scheduler.enqueue(requests);
        count
    }

    /// Re-enqueue a failed entry under the same id. Returns `false` if the
    /// entry is unknown or not in the error state.
    pub fn retry<S>(&self, id: &TaskId, scheduler: &UploadScheduler<H, S>) -> bool
    where
        H: Send + 'static,
        S: Spawn + Send + Sync + 'static,
    {
        let request = {
            let mut state = self.state.lock();
            let Some(entry) = state
                .entries
                .iter_mut()
                .find(|e| &e.id == id && e.status == EntryStatus::Error)
            else {
                return false;
            };
            entry.status = EntryStatus::Queued;
            entry.progress = 0;
            entry.error = None;
            UploadRequest::new(entry.id.clone(), entry.handle.clone())
        };
        tracing::info!(task = %id, "retrying upload");
        scheduler.enqueue([request]);
        true
    }

    /// Retry every failed entry. Returns how many were re-enqueued.
    pub fn retry_failed<S>(&self, scheduler: &UploadScheduler<H, S>) -> usize
    where
        H: Send + 'static,
        S: Spawn + Send + Sync + 'static,
    {
        let failed: Vec<TaskId> = self
            .state
            .lock()
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Error)
            .map(|e| e.id.clone())
            .collect();
        let mut retried = 0;
        for id in &failed {
            if self.retry(id, scheduler) {
                retried += 1;
            }
        }
        retried
    }
}

impl UploadBoard<ImageFile> {
    /// Validate a selection. Valid files become pending entries under fresh
    /// ids (returned in order); the error list is replaced by this batch's
    /// validation messages.
    pub fn select_files<I>(&self, files: I) -> Vec<TaskId>
    where
        I: IntoIterator<Item = ImageFile>,
    {
        let mut errors = Vec::new();
        let mut accepted = Vec::new();
        for file in files {
            match validate_file(&file) {
                Ok(()) => accepted.push(BoardEntry::pending(TaskId::generate(), file)),
                Err(err) => {
                    tracing::warn!(file = %file.name, error = %err, "file rejected");
                    errors.push(err.to_string());
                }
            }
        }

        let ids = accepted.iter().map(|e| e.id.clone()).collect();
        let mut state = self.state.lock();
        state.errors = errors;
        state.entries.extend(accepted);
        ids
    }
}

impl<H: Send> UploadObserver for UploadBoard<H> {
    fn on_progress(&self, id: &TaskId, percent: u8) {
        self.update(id, |entry| {
            entry.progress = percent;
            entry.status = EntryStatus::Uploading;
        });
    }

    fn on_success(&self, id: &TaskId, receipt: &UploadReceipt) {
        self.update(id, |entry| {
            entry.progress = 100;
            entry.status = EntryStatus::Success;
            entry.receipt = Some(receipt.clone());
        });
    }

    fn on_error(&self, id: &TaskId, message: &str) {
        self.update(id, |entry| {
            entry.status = EntryStatus::Error;
            entry.error = Some(message.to_string());
        });
    }

    fn on_queue_update(&self, status: QueueStatus) {
        self.state.lock().queue = status;
    }
}
