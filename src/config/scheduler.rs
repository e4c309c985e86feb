//! Scheduler configuration structures.

use serde::{Deserialize, Serialize};

/// Concurrency limit used when none is configured.
pub const DEFAULT_MAX_CONCURRENT: usize = 10;

const fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

/// Scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Maximum number of transfers in flight at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl SchedulerConfig {
    /// Configuration with the given concurrency limit.
    pub const fn new(max_concurrent: usize) -> Self {
        Self { max_concurrent }
    }

    /// Limit the scheduler will actually use: 0 means "unset" and maps to the default.
    pub const fn concurrency_limit(&self) -> usize {
        if self.max_concurrent == 0 {
            DEFAULT_MAX_CONCURRENT
        } else {
            self.max_concurrent
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent == 0 {
            return Err("max_concurrent must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
