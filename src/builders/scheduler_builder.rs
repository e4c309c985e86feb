//! Builder wiring a validated configuration, a transfer backend, a spawner
//! and an observer into an [`UploadScheduler`].

use std::sync::Arc;

use crate::config::SchedulerConfig;
use crate::core::{
    ConfigUpdate, SchedulerError, Spawn, Transfer, UploadObserver, UploadScheduler,
};

/// Builder for [`UploadScheduler`].
#[derive(Clone, Default)]
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    observer: Option<Arc<dyn UploadObserver>>,
}

impl SchedulerBuilder {
    /// Start from an explicit configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Start from a JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Config`] if the document does not parse or validate.
    pub fn from_json_str(input: &str) -> Result<Self, SchedulerError> {
        SchedulerConfig::from_json_str(input)
            .map(Self::new)
            .map_err(SchedulerError::Config)
    }

    /// Override the concurrency limit.
    #[must_use]
    pub fn max_concurrent(mut self, limit: usize) -> Self {
        self.config.max_concurrent = limit;
        self
    }

    /// Observer receiving lifecycle notifications.
    #[must_use]
    pub fn observer(mut self, observer: impl UploadObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Configuration the scheduler will be built with.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Validate and build.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Config`] when the configuration is invalid.
    pub fn build<H, T, S>(self, transfer: T, spawner: S) -> Result<UploadScheduler<H, S>, SchedulerError>
    where
        H: Send + 'static,
        T: Transfer<H>,
        S: Spawn + Send + Sync + 'static,
    {
        self.config
            .validate()
            .map_err(|e| SchedulerError::Config(format!("config invalid: {e}")))?;

        let scheduler = UploadScheduler::new(&self.config, transfer, spawner);
        if let Some(observer) = self.observer {
            scheduler.update_config(ConfigUpdate {
                max_concurrent: None,
                observer: Some(observer),
            })?;
        }
        tracing::debug!(max_concurrent = self.config.max_concurrent, "upload scheduler built");
        Ok(scheduler)
    }
}
