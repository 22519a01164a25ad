//! The call scheduler handed to every component that talks to the API.

use std::future::Future;

use crate::core::gate::{AdmissionGate, GateStats};
use crate::core::retry::RetryPolicy;
use crate::core::SchedulerError;

/// Admission gate plus the retry policy applied to its calls.
///
/// One instance is created per process and passed explicitly to callers.
/// Clones share the same gate.
#[derive(Clone)]
pub struct CallScheduler {
    gate: AdmissionGate,
    retry: RetryPolicy,
}

impl CallScheduler {
    /// Combine a gate and a retry policy.
    pub const fn new(gate: AdmissionGate, retry: RetryPolicy) -> Self {
        Self { gate, retry }
    }

    /// Run `thunk` once through the gate, without retries.
    ///
    /// # Errors
    ///
    /// Returns the call's error unchanged, or a gate lifecycle error.
    pub async fn submit<F, Fut, T, E>(&self, thunk: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<SchedulerError> + Send + 'static,
    {
        self.gate.submit(thunk).await
    }

    /// Run `thunk` through the gate, retrying failures per the policy.
    ///
    /// # Errors
    ///
    /// Returns the last error once the retry budget is spent, or a gate
    /// lifecycle error.
    pub async fn call_with_retry<F, Fut, T, E>(&self, thunk: F) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<SchedulerError> + Send + 'static,
    {
        self.retry.run(&self.gate, thunk).await
    }

    /// Like [`CallScheduler::call_with_retry`], with `max_retries` replacing
    /// the policy's budget for this call only.
    ///
    /// # Errors
    ///
    /// Returns the last error once `max_retries` retries are spent, or a gate
    /// lifecycle error.
    pub async fn call_with_max_retries<F, Fut, T, E>(
        &self,
        thunk: F,
        max_retries: u32,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<SchedulerError> + Send + 'static,
    {
        let policy = RetryPolicy {
            max_retries,
            ..self.retry.clone()
        };
        policy.run(&self.gate, thunk).await
    }

    /// Underlying admission gate.
    pub const fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Retry policy applied by [`CallScheduler::call_with_retry`].
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Gate statistics.
    pub fn stats(&self) -> GateStats {
        self.gate.stats()
    }

    /// Shut the gate down, dropping queued requests.
    pub fn shutdown(&self) -> usize {
        self.gate.shutdown()
    }
}
