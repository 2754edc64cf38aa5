//! Settlement engine configuration

use serde::{Deserialize, Serialize};

/// Tuning knobs for the settlement orchestrator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettlementConfig {
    /// Apply the markup when a request does not say otherwise
    #[serde(default)]
    pub finalize_by_default: bool,

    /// Maximum settlements running at once inside a batch
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Retries for transient storage failures (on top of the first attempt)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,

    /// Multiplier applied to the delay after every retry
    #[serde(default = "default_retry_backoff_factor")]
    pub retry_backoff_factor: u32,

    /// Retries for audit appends before the attempt is aborted
    #[serde(default = "default_max_retries")]
    pub audit_max_retries: u32,

    /// Deliver notifications on a background task
    #[serde(default = "default_notify_async")]
    pub notify_async: bool,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            finalize_by_default: false,
            max_concurrency: default_max_concurrency(),
            max_retries: default_max_retries(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
            retry_backoff_factor: default_retry_backoff_factor(),
            audit_max_retries: default_max_retries(),
            notify_async: default_notify_async(),
        }
    }
}

impl SettlementConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 {
            return Err("settlement.max_concurrency must be at least 1".to_string());
        }
        if self.retry_backoff_factor == 0 {
            return Err("settlement.retry_backoff_factor must be at least 1".to_string());
        }
        if self.max_retries > 10 || self.audit_max_retries > 10 {
            return Err("settlement retries are capped at 10".to_string());
        }
        Ok(())
    }
}

fn default_max_concurrency() -> usize {
    4
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_initial_delay_ms() -> u64 {
    50
}

fn default_retry_backoff_factor() -> u32 {
    2
}

fn default_notify_async() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SettlementConfig::default();
        assert!(!config.finalize_by_default);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.audit_max_retries, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_backoff_factor() {
        let config = SettlementConfig {
            retry_backoff_factor: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
