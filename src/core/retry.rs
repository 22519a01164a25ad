//! Bounded retry with backoff on top of the admission gate.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::audit::AuditAction;
use crate::core::gate::AdmissionGate;
use crate::core::request::CallState;
use crate::core::SchedulerError;

/// Maps a retry count (1 for the first retry) to the delay before it.
pub type RetryDelayFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// Delay curve between attempts.
#[derive(Clone)]
pub enum Backoff {
    /// `base * 2^retry_count`.
    Exponential {
        /// Base delay.
        base: Duration,
    },
    /// Caller-supplied curve.
    Custom(RetryDelayFn),
}

impl Backoff {
    /// Exponential backoff with the given base.
    pub const fn exponential(base: Duration) -> Self {
        Self::Exponential { base }
    }

    /// Backoff computed by `f`.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Delay before retry number `retry_count`.
    pub fn delay(&self, retry_count: u32) -> Duration {
        match self {
            Self::Exponential { base } => {
                base.saturating_mul(2u32.saturating_pow(retry_count))
            }
            Self::Custom(f) => f(retry_count),
        }
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exponential { base } => f
                .debug_struct("Exponential")
                .field("base", base)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Fixed retry budget and backoff applied to every call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum re-attempts after the first failure.
    pub max_retries: u32,
    /// Delay curve.
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Policy with `max_retries` and exponential backoff from `base`.
    pub const fn exponential(max_retries: u32, base: Duration) -> Self {
        Self {
            max_retries,
            backoff: Backoff::exponential(base),
        }
    }

    /// Policy that never retries.
    pub const fn none() -> Self {
        Self::exponential(0, Duration::ZERO)
    }

    /// State a call moves to after a failed attempt: `FailedRetry` while
    /// budget remains, `FailedTerminal` once it is spent.
    pub const fn after_failure(&self, retry_count: u32) -> CallState {
        if retry_count < self.max_retries {
            CallState::FailedRetry
        } else {
            CallState::FailedTerminal
        }
    }

    /// Run `thunk` through `gate`, retrying failures.
    ///
    /// Each attempt, retries included, waits for admission like any other
    /// request. On failure the retry counter is incremented, the caller sleeps
    /// for `backoff.delay(counter)` and the call is queued again. The first
    /// success wins; once the budget is spent the last error is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns the call's final error, or a gate lifecycle error converted
    /// into `E`.
    pub async fn run<F, Fut, T, E>(&self, gate: &AdmissionGate, thunk: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<SchedulerError> + Send + 'static,
    {
        let thunk = Arc::new(thunk);
        let id = gate.next_call_id();
        let mut retry_count = 0;

        loop {
            let attempt = Arc::clone(&thunk);
            let outcome = match gate.run_attempt(id, retry_count, move || (*attempt)()).await {
                Ok(outcome) => outcome,
                Err(e) => return Err(E::from(e)),
            };

            match outcome {
                Ok(value) => {
                    gate.record(id, retry_count, AuditAction::Succeed);
                    return Ok(value);
                }
                Err(err) if self.after_failure(retry_count).is_terminal() => {
                    gate.record(id, retry_count, AuditAction::Exhaust);
                    tracing::debug!(call_id = id, retry_count, "retry budget exhausted");
                    return Err(err);
                }
                Err(_) => {
                    retry_count += 1;
                    let delay = self.backoff.delay(retry_count);
                    gate.record(id, retry_count, AuditAction::Retry);
                    tracing::warn!(
                        call_id = id,
                        retry_count,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis(),
                        "call failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::exponential(3, Duration::from_millis(50))
    }
}
