//! Error type for curriculum generation.

use thiserror::Error;

use crate::core::SchedulerError;
use crate::generation::ApiError;
use crate::infra::store::StoreError;

/// Errors that stop a curriculum run.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The completion API failed after every retry.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The scheduler could not run the call.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    /// A lesson could not be persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The API answered without any choice.
    #[error("empty completion for prompt: {0}")]
    EmptyCompletion(String),
}
