//! The transfer capability and its progress channel.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::error::TransferError;
use super::task::UploadReceipt;

/// Abstraction for moving one file to remote storage.
///
/// The scheduler calls `transfer` once per admitted task and never retries.
/// Implementations report fractional progress through `progress` as often as
/// they like and resolve to the stored location or an error.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use upload_scheduler::core::{ProgressReporter, Transfer, TransferError, UploadReceipt};
///
/// struct InstantTransfer;
///
/// #[async_trait]
/// impl Transfer<String> for InstantTransfer {
///     async fn transfer(
///         &self,
///         name: String,
///         progress: ProgressReporter,
///     ) -> Result<UploadReceipt, TransferError> {
///         progress.report(100);
///         Ok(UploadReceipt::new(format!("https://cdn.example/{name}"), name))
///     }
/// }
/// ```
#[async_trait]
pub trait Transfer<H>: Send + Sync + 'static
where
    H: Send + 'static,
{
    /// Perform a single transfer attempt for `handle`.
    async fn transfer(
        &self,
        handle: H,
        progress: ProgressReporter,
    ) -> Result<UploadReceipt, TransferError>;
}

#[async_trait]
impl<H, T> Transfer<H> for Arc<T>
where
    H: Send + 'static,
    T: Transfer<H> + ?Sized,
{
    async fn transfer(
        &self,
        handle: H,
        progress: ProgressReporter,
    ) -> Result<UploadReceipt, TransferError> {
        (**self).transfer(handle, progress).await
    }
}

/// Cloneable progress handle passed to each transfer.
///
/// Reports after the task settled are ignored by the scheduler, as are
/// reports that would move progress backwards. Reports from different threads
/// are delivered one at a time; do not report from inside `on_progress`.
#[derive(Clone)]
pub struct ProgressReporter {
    sink: Arc<dyn Fn(u8) + Send + Sync>,
}

impl ProgressReporter {
    pub(crate) fn new(sink: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// A reporter connected to nothing, for driving a transfer outside a scheduler.
    pub fn detached() -> Self {
        Self::new(|_| {})
    }

    /// Report an integer percentage; values above 100 are clamped.
    pub fn report(&self, percent: u8) {
        (self.sink)(percent.min(100));
    }

    /// Report `sent` of `total` bytes as a rounded percentage. No-op when `total` is 0.
    pub fn report_bytes(&self, sent: u64, total: u64) {
        if total == 0 {
            return;
        }
        let total = u128::from(total);
        let sent = u128::from(sent).min(total);
        let percent = (sent * 100 + total / 2) / total;
        self.report(u8::try_from(percent).unwrap_or(100));
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter").finish_non_exhaustive()
    }
}
