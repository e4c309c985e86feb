//! Bounded-concurrency upload scheduler.
//!
//! Pending tasks wait in a FIFO queue and are admitted greedily while the
//! active set is below the concurrency limit. Each admitted task runs its
//! transfer on the configured spawner; when it settles, the slot is released
//! and admission runs again.
//!
//! All bookkeeping (pending queue, active set, limit, observer) lives behind a
//! single `parking_lot::Mutex`. Observers are always called with that lock
//! released, and a panicking observer is logged and otherwise ignored so it
//! can never strand a concurrency slot.
//!
//! Each admitted task also owns a dispatch gate. Progress checks and
//! `on_progress` calls happen while holding it, and settlement closes it before
//! the terminal notification, so progress for a task is delivered in order and
//! never after its success or error.

use std::collections::BTreeMap;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;

use super::error::{SchedulerError, TransferError};
use super::observer::{NoopObserver, UploadObserver};
use super::queue::{PendingQueue, PendingTask};
use super::task::{QueueStatus, UploadReceipt, UploadRequest, UploadTask};
use super::transfer::{ProgressReporter, Transfer};
use crate::config::SchedulerConfig;
use crate::util::ids::TaskId;

/// Abstraction for spawning task execution on a runtime.
pub trait Spawn {
    /// Spawn an async task that returns a future.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Partial configuration update applied atomically by [`UploadScheduler::update_config`].
///
/// `None` fields are left untouched. The four callbacks belong to one
/// observer, so replacing only some of them means installing an observer that
/// overrides those and forwards the rest (see [`ObserverSet`](super::ObserverSet)
/// to combine several).
#[derive(Clone, Default)]
pub struct ConfigUpdate {
    /// New concurrency limit; must be greater than 0.
    pub max_concurrent: Option<usize>,
    /// Replacement observer.
    pub observer: Option<Arc<dyn UploadObserver>>,
}

impl ConfigUpdate {
    /// An update that only changes the concurrency limit.
    pub const fn max_concurrent(limit: usize) -> Self {
        Self {
            max_concurrent: Some(limit),
            observer: None,
        }
    }

    /// Also replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl UploadObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }
}

/// Open while the task may still report progress; closed at settlement.
type DispatchGate = Arc<Mutex<bool>>;

/// Invoke one observer callback, containing any panic it raises.
fn dispatch(
    observer: &dyn UploadObserver,
    callback: &'static str,
    call: impl FnOnce(&dyn UploadObserver),
) {
    if panic::catch_unwind(AssertUnwindSafe(|| call(observer))).is_err() {
        tracing::error!(callback, "upload observer panicked");
    }
}

struct SchedulerState<H> {
    pending: PendingQueue<H>,
    /// Keyed by admission ticket, so iteration order is admission order and a
    /// reused id never aliases an earlier incarnation.
    active: BTreeMap<u64, UploadTask>,
    next_ticket: u64,
    max_concurrent: usize,
    observer: Arc<dyn UploadObserver>,
}

impl<H> SchedulerState<H> {
    fn status(&self) -> QueueStatus {
        QueueStatus::new(self.pending.len(), self.active.len())
    }
}

struct Shared<H, S> {
    state: Mutex<SchedulerState<H>>,
    transfer: Arc<dyn Transfer<H>>,
    spawner: S,
}

/// Upload scheduler handle. Cheap to clone; clones share one queue.
pub struct UploadScheduler<H, S> {
    shared: Arc<Shared<H, S>>,
}

impl<H, S> Clone for UploadScheduler<H, S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<H, S> UploadScheduler<H, S>
where
    H: Send + 'static,
    S: Spawn + Send + Sync + 'static,
{
    /// Create a scheduler with no observer attached.
    ///
    /// A configured limit of 0 falls back to the default limit.
    pub fn new(config: &SchedulerConfig, transfer: impl Transfer<H>, spawner: S) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(SchedulerState {
                    pending: PendingQueue::new(),
                    active: BTreeMap::new(),
                    next_ticket: 0,
                    max_concurrent: config.concurrency_limit(),
                    observer: Arc::new(NoopObserver),
                }),
                transfer: Arc::new(transfer),
                spawner,
            }),
        }
    }

    /// Attach the observer that receives lifecycle notifications.
    #[must_use]
    pub fn with_observer(self, observer: impl UploadObserver + 'static) -> Self {
        self.shared.state.lock().observer = Arc::new(observer);
        self
    }

    /// Append tasks to the pending queue in the given order, then admit as
    /// many as the limit allows. Never rejects; an empty batch is a no-op.
    pub fn enqueue<I>(&self, requests: I)
    where
        I: IntoIterator<Item = UploadRequest<H>>,
    {
        let (added, status, observer) = {
            let mut state = self.shared.state.lock();
            let before = state.pending.len();
            for request in requests {
                state.pending.push(request);
            }
            let added = state.pending.len() - before;
            (added, state.status(), Arc::clone(&state.observer))
        };
        if added == 0 {
            return;
        }

        tracing::info!(
            added,
            pending = status.pending_len,
            active = status.active_count,
            "upload tasks enqueued"
        );
        dispatch(&*observer, "on_queue_update", |o| o.on_queue_update(status));
        self.admit();
    }

    /// Current queue depth. Pure read.
    pub fn status(&self) -> QueueStatus {
        self.shared.state.lock().status()
    }

    /// Current concurrency limit.
    pub fn max_concurrent(&self) -> usize {
        self.shared.state.lock().max_concurrent
    }

    /// Snapshot of tracked tasks: pending in queue order, then active in
    /// admission order.
    pub fn tasks(&self) -> Vec<UploadTask> {
        let state = self.shared.state.lock();
        state
            .pending
            .iter()
            .chain(state.active.values())
            .cloned()
            .collect()
    }

    /// Discard every task that has not started yet. Active transfers are not
    /// affected and still settle normally. Returns the number discarded.
    pub fn clear_queue(&self) -> usize {
        let (cleared, status, observer) = {
            let mut state = self.shared.state.lock();
            let cleared = state.pending.clear();
            (cleared, state.status(), Arc::clone(&state.observer))
        };
        tracing::info!(cleared, active = status.active_count, "pending uploads cleared");
        dispatch(&*observer, "on_queue_update", |o| o.on_queue_update(status));
        cleared
    }

    /// Replace any subset of {limit, observer}. Takes effect at the next
    /// admission decision; tasks already admitted always run to completion.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidConcurrency`] for a limit of 0, in which case
    /// nothing is changed.
    pub fn update_config(&self, update: ConfigUpdate) -> Result<(), SchedulerError> {
        if update.max_concurrent == Some(0) {
            return Err(SchedulerError::InvalidConcurrency(0));
        }
        let mut state = self.shared.state.lock();
        if let Some(limit) = update.max_concurrent {
            tracing::debug!(from = state.max_concurrent, to = limit, "concurrency limit updated");
            state.max_concurrent = limit;
        }
        if let Some(observer) = update.observer {
            state.observer = observer;
        }
        Ok(())
    }

    /// Greedy FIFO admission. The only place the limit is enforced.
    fn admit(&self) {
        loop {
            let (ticket, id, handle, status, observer) = {
                let mut state = self.shared.state.lock();
                if state.active.len() >= state.max_concurrent {
                    break;
                }
                let Some(PendingTask { mut task, handle }) = state.pending.pop() else {
                    break;
                };
                task.start();
                let ticket = state.next_ticket;
                state.next_ticket += 1;
                let id = task.id.clone();
                state.active.insert(ticket, task);
                (ticket, id, handle, state.status(), Arc::clone(&state.observer))
            };

            tracing::debug!(task = %id, ticket, "admitted upload");
            dispatch(&*observer, "on_queue_update", |o| o.on_queue_update(status));
            self.run_task(ticket, id, handle);
        }
    }

    fn run_task(&self, ticket: u64, id: TaskId, handle: H) {
        let gate: DispatchGate = Arc::new(Mutex::new(true));
        let progress = {
            let shared = Arc::clone(&self.shared);
            let gate = Arc::clone(&gate);
            ProgressReporter::new(move |percent| {
                let open = gate.lock();
                if *open {
                    Self::record_progress(&shared, ticket, percent);
                }
            })
        };
        let this = self.clone();

        self.shared.spawner.spawn(async move {
            tracing::debug!(task = %id, "starting transfer");
            let transfer = Arc::clone(&this.shared.transfer);
            let outcome = AssertUnwindSafe(transfer.transfer(handle, progress))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(TransferError::Other("transfer panicked".into())));
            // waits for a progress dispatch already under way on another thread
            *gate.lock() = false;
            this.settle(ticket, outcome);
        });
    }

    /// Caller holds the task's open dispatch gate.
    fn record_progress(shared: &Shared<H, S>, ticket: u64, percent: u8) {
        let mut state = shared.state.lock();
        let Some(task) = state.active.get_mut(&ticket) else {
            return;
        };
        if !task.record_progress(percent) {
            return;
        }
        let id = task.id.clone();
        let progress = task.progress;
        let observer = Arc::clone(&state.observer);
        drop(state);

        dispatch(&*observer, "on_progress", |o| o.on_progress(&id, progress));
    }

    /// Terminal handling: mark, notify, release the slot, notify depth, admit.
    fn settle(&self, ticket: u64, outcome: Result<UploadReceipt, TransferError>) {
        let (id, observer) = {
            let mut state = self.shared.state.lock();
            let observer = Arc::clone(&state.observer);
            let Some(task) = state.active.get_mut(&ticket) else {
                tracing::warn!(ticket, "settled transfer has no active task");
                return;
            };
            match &outcome {
                Ok(receipt) => task.succeed(receipt.clone()),
                Err(err) => task.fail(err.to_string()),
            }
            (task.id.clone(), observer)
        };

        match &outcome {
            Ok(receipt) => {
                tracing::info!(task = %id, url = %receipt.url, "upload succeeded");
                dispatch(&*observer, "on_success", |o| o.on_success(&id, receipt));
            }
            Err(err) => {
                tracing::warn!(task = %id, error = %err, "upload failed");
                let message = err.to_string();
                dispatch(&*observer, "on_error", |o| o.on_error(&id, &message));
            }
        }

        let (status, observer) = {
            let mut state = self.shared.state.lock();
            state.active.remove(&ticket);
            (state.status(), Arc::clone(&state.observer))
        };
        dispatch(&*observer, "on_queue_update", |o| o.on_queue_update(status));
        self.admit();
    }
}
