//! Shared fixtures: a transfer driven step by step from the test body and an
//! observer that forwards every notification into a channel.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use upload_scheduler::config::SchedulerConfig;
use upload_scheduler::core::{
    ProgressReporter, QueueStatus, Transfer, TransferError, UploadObserver, UploadReceipt,
    UploadRequest, UploadScheduler,
};
use upload_scheduler::runtime::TokioSpawner;
use upload_scheduler::util::TaskId;

/// One instruction for a scripted transfer.
#[derive(Debug)]
pub enum Step {
    Progress(u8),
    Succeed,
    Fail(String),
    Panic,
}

/// Test-side control of one pending transfer.
#[derive(Clone)]
pub struct Script {
    tx: mpsc::UnboundedSender<Step>,
}

impl Script {
    pub fn progress(&self, percent: u8) {
        self.tx.send(Step::Progress(percent)).expect("transfer gone");
    }

    pub fn succeed(&self) {
        self.tx.send(Step::Succeed).expect("transfer gone");
    }

    pub fn fail(&self, message: &str) {
        self.tx.send(Step::Fail(message.to_string())).expect("transfer gone");
    }

    pub fn panic(&self) {
        self.tx.send(Step::Panic).expect("transfer gone");
    }
}

/// Transfer whose handle is a script key. Each call consumes the script
/// registered for that key and follows its steps.
#[derive(Clone, Default)]
pub struct ScriptedTransfer {
    scripts: Arc<Mutex<HashMap<String, mpsc::UnboundedReceiver<Step>>>>,
    started: Arc<Mutex<Vec<String>>>,
    reporters: Arc<Mutex<HashMap<String, ProgressReporter>>>,
}

impl ScriptedTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the script for `key`.
    pub fn script(&self, key: &str) -> Script {
        let (tx, rx) = mpsc::unbounded_channel();
        self.scripts.lock().insert(key.to_string(), rx);
        Script { tx }
    }

    /// Keys whose transfer has started, in start order.
    pub fn started(&self) -> Vec<String> {
        self.started.lock().clone()
    }

    /// The reporter handed to the latest transfer for `key`.
    pub fn reporter(&self, key: &str) -> Option<ProgressReporter> {
        self.reporters.lock().get(key).cloned()
    }
}

#[async_trait]
impl Transfer<String> for ScriptedTransfer {
    async fn transfer(
        &self,
        key: String,
        progress: ProgressReporter,
    ) -> Result<UploadReceipt, TransferError> {
        self.started.lock().push(key.clone());
        self.reporters.lock().insert(key.clone(), progress.clone());
        let script = self.scripts.lock().remove(&key);
        let Some(mut script) = script else {
            return Err(TransferError::Other(format!("no script for {key}")));
        };

        while let Some(step) = script.recv().await {
            match step {
                Step::Progress(percent) => progress.report(percent),
                Step::Succeed => return Ok(receipt(&key)),
                Step::Fail(message) => return Err(TransferError::Other(message)),
                Step::Panic => panic!("scripted panic for {key}"),
            }
        }
        Err(TransferError::Aborted)
    }
}

pub fn receipt(key: &str) -> UploadReceipt {
    UploadReceipt::new(format!("https://cdn.test/{key}.png"), key)
}

pub fn request(key: &str) -> UploadRequest<String> {
    UploadRequest::new(key, key.to_string())
}

/// Notification as recorded by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Progress(String, u8),
    Success(String, String),
    Error(String, String),
    Queue(usize, usize),
}

impl Event {
    pub fn queue(pending_len: usize, active_count: usize) -> Self {
        Self::Queue(pending_len, active_count)
    }

    pub fn success(key: &str) -> Self {
        Self::Success(key.to_string(), receipt(key).url)
    }

    pub fn error(key: &str, message: &str) -> Self {
        Self::Error(key.to_string(), message.to_string())
    }

    pub fn progress(key: &str, percent: u8) -> Self {
        Self::Progress(key.to_string(), percent)
    }
}

pub struct RecordingObserver {
    tx: mpsc::UnboundedSender<Event>,
}

impl RecordingObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl UploadObserver for RecordingObserver {
    fn on_progress(&self, id: &TaskId, percent: u8) {
        self.send(Event::Progress(id.to_string(), percent));
    }

    fn on_success(&self, id: &TaskId, receipt: &UploadReceipt) {
        self.send(Event::Success(id.to_string(), receipt.url.clone()));
    }

    fn on_error(&self, id: &TaskId, message: &str) {
        self.send(Event::Error(id.to_string(), message.to_string()));
    }

    fn on_queue_update(&self, status: QueueStatus) {
        self.send(Event::Queue(status.pending_len, status.active_count));
    }
}

pub type TestScheduler = UploadScheduler<String, TokioSpawner>;

/// Scheduler with `limit` slots, a scripted transfer and a recording observer.
pub fn harness(limit: usize) -> (TestScheduler, ScriptedTransfer, mpsc::UnboundedReceiver<Event>) {
    let transfer = ScriptedTransfer::new();
    let (observer, events) = RecordingObserver::new();
    let scheduler = UploadScheduler::new(
        &SchedulerConfig::new(limit),
        transfer.clone(),
        TokioSpawner::current().expect("inside a tokio runtime"),
    )
    .with_observer(observer);
    (scheduler, transfer, events)
}

/// Events already delivered, without waiting.
pub fn drain(events: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

/// Collect events until one matches `stop` (inclusive). Panics after 5s.
pub async fn collect_until(
    events: &mut mpsc::UnboundedReceiver<Event>,
    stop: &Event,
) -> Vec<Event> {
    let mut out = Vec::new();
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for {stop:?}; saw {out:?}"))
            .expect("observer dropped");
        let done = &event == stop;
        out.push(event);
        if done {
            return out;
        }
    }
}

/// Poll `condition` until it holds. Panics after 5s.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "condition not reached");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
