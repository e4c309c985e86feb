//! Unbounded FIFO queue of tasks waiting for admission.

use std::collections::VecDeque;

use super::task::{UploadRequest, UploadTask};

/// A queued task together with the handle its transfer will consume.
#[derive(Debug)]
pub struct PendingTask<H> {
    /// Lifecycle record, status `Queued`.
    pub task: UploadTask,
    /// File handle, moved into the transfer on admission.
    pub handle: H,
}

/// Pending queue. Insertion order is admission order; O(1) push and pop.
#[derive(Debug)]
pub struct PendingQueue<H> {
    tasks: VecDeque<PendingTask<H>>,
}

impl<H> Default for PendingQueue<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> PendingQueue<H> {
    /// Create an empty queue.
    pub const fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Append a request at the tail as a `Queued` task.
    pub fn push(&mut self, request: UploadRequest<H>) {
        self.tasks.push_back(PendingTask {
            task: UploadTask::queued(request.id),
            handle: request.handle,
        });
    }

    /// Remove the head of the queue.
    pub fn pop(&mut self) -> Option<PendingTask<H>> {
        self.tasks.pop_front()
    }

    /// Drop every pending task and return how many were discarded.
    pub fn clear(&mut self) -> usize {
        let removed = self.tasks.len();
        self.tasks.clear();
        removed
    }

    /// Pending tasks in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &UploadTask> {
        self.tasks.iter().map(|pending| &pending.task)
    }

    /// Current depth.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
