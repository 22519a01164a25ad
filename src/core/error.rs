//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by the scheduler itself.
///
/// These never describe a failed call: a call's own error is handed back to
/// the caller unchanged. They only cover the scheduler's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The gate was shut down before the call could be queued.
    #[error("scheduler shut down")]
    Shutdown,
    /// The queued call was discarded before it produced an outcome.
    #[error("call {0} dropped before completion")]
    Dropped(u64),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// No async runtime available to drive the gate.
    #[error("runtime unavailable: {0}")]
    Runtime(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
