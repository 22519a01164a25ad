//! Scheduler configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{GateLimits, Refresh, RetryPolicy};

/// Retry budget and backoff base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum re-attempts per request.
    pub max_retries: u32,
    /// Base of the exponential backoff in milliseconds.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 50,
        }
    }
}

/// Admission and retry configuration for the call scheduler.
///
/// The defaults allow two requests per minute: a reservoir of two permits
/// reset every 60 seconds, with 30 seconds between dispatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Minimum milliseconds between dispatches.
    pub min_time_ms: u64,
    /// Initial permits and reservoir capacity; `None` means unlimited.
    pub reservoir: Option<u32>,
    /// Permits granted on each refresh.
    pub reservoir_refresh_amount: Option<u32>,
    /// Milliseconds between refreshes.
    pub reservoir_refresh_interval_ms: Option<u64>,
    /// Retry settings.
    pub retry: RetryConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_time_ms: 60_000 / 2,
            reservoir: Some(2),
            reservoir_refresh_amount: Some(2),
            reservoir_refresh_interval_ms: Some(60_000),
            retry: RetryConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Configuration with no spacing, no reservoir and no retries.
    pub fn unlimited() -> Self {
        Self {
            min_time_ms: 0,
            reservoir: None,
            reservoir_refresh_amount: None,
            reservoir_refresh_interval_ms: None,
            retry: RetryConfig {
                max_retries: 0,
                base_delay_ms: 0,
            },
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.reservoir == Some(0) {
            return Err("reservoir must be greater than 0".into());
        }
        match (self.reservoir_refresh_amount, self.reservoir_refresh_interval_ms) {
            (None, None) => {}
            (Some(_), None) | (None, Some(_)) => {
                return Err(
                    "reservoir_refresh_amount and reservoir_refresh_interval_ms must be set together"
                        .into(),
                );
            }
            (Some(amount), Some(interval)) => {
                if self.reservoir.is_none() {
                    return Err("reservoir refresh requires a reservoir".into());
                }
                if amount == 0 {
                    return Err("reservoir_refresh_amount must be greater than 0".into());
                }
                if interval == 0 {
                    return Err("reservoir_refresh_interval_ms must be greater than 0".into());
                }
            }
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation message.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Admission limits for the gate.
    pub fn gate_limits(&self) -> GateLimits {
        let refresh = self
            .reservoir_refresh_amount
            .zip(self.reservoir_refresh_interval_ms)
            .map(|(amount, interval_ms)| Refresh {
                amount,
                interval: Duration::from_millis(interval_ms),
            });
        GateLimits {
            min_time: Duration::from_millis(self.min_time_ms),
            reservoir: self.reservoir,
            refresh,
        }
    }

    /// Exponential retry policy described by [`SchedulerConfig::retry`].
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.retry.max_retries,
            Duration::from_millis(self.retry.base_delay_ms),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_two_per_minute() {
        let cfg = SchedulerConfig::default();
        assert!(cfg.validate().is_ok());

        let limits = cfg.gate_limits();
        assert_eq!(limits.min_time, Duration::from_secs(30));
        assert_eq!(limits.reservoir, Some(2));
        assert_eq!(
            limits.refresh,
            Some(Refresh {
                amount: 2,
                interval: Duration::from_secs(60),
            })
        );

        let retry = cfg.retry_policy();
        assert_eq!(retry.max_retries, 3);
        assert_eq!(retry.backoff.delay(3), Duration::from_millis(400));
    }

    #[test]
    fn test_unlimited_is_valid() {
        let cfg = SchedulerConfig::unlimited();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.gate_limits(), GateLimits::unlimited());
    }

    #[test]
    fn test_zero_reservoir_rejected() {
        let cfg = SchedulerConfig {
            reservoir: Some(0),
            ..SchedulerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_partial_refresh_rejected() {
        let cfg = SchedulerConfig {
            reservoir_refresh_interval_ms: None,
            ..SchedulerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_refresh_without_reservoir_rejected() {
        let cfg = SchedulerConfig {
            reservoir: None,
            ..SchedulerConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("requires a reservoir"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let cfg = SchedulerConfig {
            reservoir_refresh_interval_ms: Some(0),
            ..SchedulerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let cfg = SchedulerConfig::from_json_str(r#"{ "min_time_ms": 250, "retry": { "max_retries": 5 } }"#)
            .unwrap();
        assert_eq!(cfg.min_time_ms, 250);
        assert_eq!(cfg.reservoir, Some(2));
        assert_eq!(cfg.retry.max_retries, 5);
        assert_eq!(cfg.retry.base_delay_ms, 50);
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(SchedulerConfig::from_json_str(r#"{ "reservoir": 0 }"#).is_err());
        assert!(SchedulerConfig::from_json_str("not json").is_err());
    }
}
