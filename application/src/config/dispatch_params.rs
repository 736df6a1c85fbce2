//! Dispatch parameters: retry and timeout control for provider calls.

use std::time::Duration;

/// Retry policy for transient provider failures (overload, rate limit).
///
/// `max_attempts` counts the first call. The delay before attempt `n + 1`
/// is `base_delay * 2^(n - 1)`: 2s, 4s, 8s, ... with the default base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Backoff to wait after the given (1-indexed) failed attempt
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Parameters shared by every chain step unless the step overrides them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchParams {
    /// Timeout for one attempt of one chain step
    pub step_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for DispatchParams {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

impl DispatchParams {
    pub fn with_step_timeout(mut self, timeout: Duration) -> Self {
        self.step_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
