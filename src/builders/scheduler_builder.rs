//! Fluent construction of a [`CallScheduler`].

use std::sync::Arc;
use std::time::Duration;

use crate::config::SchedulerConfig;
use crate::core::{
    AdmissionGate, AuditSink, Backoff, CallScheduler, RetryPolicy, SchedulerError, Spawn,
};
use crate::runtime::TokioSpawner;

/// Builder for a [`CallScheduler`].
///
/// ```rust,ignore
/// let scheduler = SchedulerBuilder::new()
///     .min_time(Duration::from_secs(30))
///     .reservoir(2)
///     .reservoir_refresh(2, Duration::from_secs(60))
///     .max_retries(3)
///     .retry_delay(|n| Duration::from_millis(50 * 2u64.pow(n)))
///     .build()?;
/// ```
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    retry_delay: Option<Backoff>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start from an unlimited configuration.
    pub fn new() -> Self {
        Self::from_config(SchedulerConfig::unlimited())
    }

    /// Start from an existing configuration.
    pub fn from_config(config: SchedulerConfig) -> Self {
        Self {
            config,
            retry_delay: None,
            audit: None,
        }
    }

    /// Minimum time between dispatches.
    #[must_use]
    pub fn min_time(mut self, min_time: Duration) -> Self {
        self.config.min_time_ms = duration_ms(min_time);
        self
    }

    /// Initial permits and capacity of the reservoir.
    #[must_use]
    pub fn reservoir(mut self, capacity: u32) -> Self {
        self.config.reservoir = Some(capacity);
        self
    }

    /// Reset the reservoir to `amount` every `interval`.
    #[must_use]
    pub fn reservoir_refresh(mut self, amount: u32, interval: Duration) -> Self {
        self.config.reservoir_refresh_amount = Some(amount);
        self.config.reservoir_refresh_interval_ms = Some(duration_ms(interval));
        self
    }

    /// Maximum re-attempts per call.
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.retry.max_retries = max_retries;
        self
    }

    /// Base of the exponential backoff.
    #[must_use]
    pub fn base_delay(mut self, base: Duration) -> Self {
        self.config.retry.base_delay_ms = duration_ms(base);
        self.retry_delay = None;
        self
    }

    /// Replace the exponential curve with `f(retry_count)`.
    #[must_use]
    pub fn retry_delay<F>(mut self, f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.retry_delay = Some(Backoff::custom(f));
        self
    }

    /// Report call lifecycle events to `sink`.
    #[must_use]
    pub fn audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Configuration accumulated so far.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Build on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` for invalid limits and
    /// `SchedulerError::Runtime` outside a tokio runtime.
    pub fn build(self) -> Result<CallScheduler, SchedulerError> {
        let spawner = TokioSpawner::current()?;
        self.build_with(spawner)
    }

    /// Build with an explicit spawner.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidConfig` for invalid limits.
    pub fn build_with<S>(self, spawner: S) -> Result<CallScheduler, SchedulerError>
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        self.config
            .validate()
            .map_err(SchedulerError::InvalidConfig)?;

        let mut retry = self.config.retry_policy();
        if let Some(backoff) = self.retry_delay {
            retry = RetryPolicy {
                backoff,
                ..retry
            };
        }
        let gate = AdmissionGate::new(self.config.gate_limits(), spawner, self.audit);
        Ok(CallScheduler::new(gate, retry))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a scheduler from configuration using the provided spawner.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidConfig` when `cfg` does not validate.
pub fn build_scheduler<S>(cfg: &SchedulerConfig, spawner: S) -> Result<CallScheduler, SchedulerError>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    SchedulerBuilder::from_config(cfg.clone()).build_with(spawner)
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
