//! Bounded retry with exponential backoff for transient storage failures.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};
use wr_shared::SettlementConfig;

use crate::errors::DomainResult;

/// How often and how patiently to retry a retriable operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries on top of the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each retry
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::settlement(&SettlementConfig::default())
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_factor: u32) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_factor: backoff_factor.max(1),
        }
    }

    /// Single attempt, no retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, 1)
    }

    /// Policy for worklog reads and commits
    pub fn settlement(config: &SettlementConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::from_millis(config.retry_initial_delay_ms),
            config.retry_backoff_factor,
        )
    }

    /// Policy for audit appends
    pub fn audit(config: &SettlementConfig) -> Self {
        Self::new(
            config.audit_max_retries,
            Duration::from_millis(config.retry_initial_delay_ms),
            config.retry_backoff_factor,
        )
    }

    /// Delay before retry number `retry` (0-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.backoff_factor.saturating_pow(retry);
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `operation`, retrying while it fails with a retriable error.
    ///
    /// Non-retriable errors return immediately. After the last retry the
    /// final error is returned unchanged.
    pub async fn run<T, F, Fut>(&self, name: &str, mut operation: F) -> DomainResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = DomainResult<T>>,
    {
        let mut retry = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retriable() && retry < self.max_retries => {
                    let delay = self.delay_for(retry);
                    retry += 1;
                    warn!(
                        operation = name,
                        attempt = retry,
                        max_retries = self.max_retries,
                        "Transient failure, retrying after {:?}: {}",
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    debug!(operation = name, attempts = retry + 1, "Giving up: {}", e);
                    return Err(e);
                }
            }
        }
    }
}
