//! Tests for builder modules

use upload_scheduler::builders::SchedulerBuilder;
use upload_scheduler::config::SchedulerConfig;
use upload_scheduler::core::{
    NoopObserver, ProgressReporter, SchedulerError, Transfer, TransferError, UploadReceipt,
};
use upload_scheduler::runtime::TokioSpawner;

struct NeverCalled;

#[async_trait::async_trait]
impl Transfer<()> for NeverCalled {
    async fn transfer(
        &self,
        _handle: (),
        _progress: ProgressReporter,
    ) -> Result<UploadReceipt, TransferError> {
        Err(TransferError::Aborted)
    }
}

#[test]
fn test_builder_defaults() {
    let builder = SchedulerBuilder::default();
    assert_eq!(builder.config().max_concurrent, 10);
}

#[test]
fn test_builder_override_limit() {
    let builder = SchedulerBuilder::new(SchedulerConfig::new(2)).max_concurrent(7);
    assert_eq!(builder.config().max_concurrent, 7);
}

#[test]
fn test_builder_from_json() {
    let builder = SchedulerBuilder::from_json_str(r#"{"max_concurrent": 5}"#).unwrap();
    assert_eq!(builder.config().max_concurrent, 5);

    let err = SchedulerBuilder::from_json_str("{").err().unwrap();
    assert!(matches!(err, SchedulerError::Config(_)));
}

#[tokio::test]
async fn test_builder_build() {
    let scheduler = SchedulerBuilder::default()
        .max_concurrent(3)
        .observer(NoopObserver)
        .build(NeverCalled, TokioSpawner::current().unwrap())
        .unwrap();
    assert_eq!(scheduler.max_concurrent(), 3);
    assert!(!scheduler.status().is_processing());
}

#[tokio::test]
async fn test_builder_rejects_zero_limit() {
    let err = SchedulerBuilder::default()
        .max_concurrent(0)
        .build(NeverCalled, TokioSpawner::current().unwrap())
        .err()
        .unwrap();
    assert!(matches!(err, SchedulerError::Config(_)));
}
