//! Retry and timeout configuration from TOML (`[behavior]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use triplet_application::{DispatchParams, RetryPolicy};

/// Raw behavior configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Timeout for one attempt of one chain step
    pub step_timeout_seconds: u64,
    /// Attempts per retryable step, first call included
    pub max_attempts: u32,
    /// First backoff delay; doubles on every retry
    pub backoff_base_ms: u64,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        let params = DispatchParams::default();
        Self {
            step_timeout_seconds: params.step_timeout.as_secs(),
            max_attempts: params.retry.max_attempts,
            backoff_base_ms: params.retry.base_delay.as_millis() as u64,
        }
    }
}

impl FileBehaviorConfig {
    pub fn to_dispatch_params(&self) -> DispatchParams {
        DispatchParams::default()
            .with_step_timeout(Duration::from_secs(self.step_timeout_seconds))
            .with_retry(RetryPolicy::new(
                self.max_attempts,
                Duration::from_millis(self.backoff_base_ms),
            ))
    }
}
