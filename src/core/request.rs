//! Call requests and the FIFO queue they wait in.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::Instant;

/// Correlation identifier for a logical call, shared by all of its attempts.
pub type CallId = u64;

/// Boxed future a dispatched job runs to completion.
pub type JobFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Deferred unit of work. Nothing runs until the gate invokes it.
pub type Job = Box<dyn FnOnce() -> JobFuture + Send + 'static>;

/// Lifecycle of a call request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    /// Waiting in the pending queue.
    Queued,
    /// Admitted and running.
    Dispatching,
    /// Finished successfully.
    Succeeded,
    /// Failed and will be queued again.
    FailedRetry,
    /// Failed with no retry budget left.
    FailedTerminal,
}

impl CallState {
    /// Whether no further transition can happen.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::FailedTerminal)
    }
}

/// A queued attempt of a call.
pub struct CallRequest {
    /// Correlation id.
    pub id: CallId,
    /// Failures seen before this attempt.
    pub retry_count: u32,
    /// When the attempt entered the queue.
    pub enqueued_at: Instant,
    job: Job,
    abandoned: Option<Arc<AtomicBool>>,
}

impl CallRequest {
    /// Wrap a job for queueing.
    pub fn new(id: CallId, retry_count: u32, enqueued_at: Instant, job: Job) -> Self {
        Self {
            id,
            retry_count,
            enqueued_at,
            job,
            abandoned: None,
        }
    }

    /// Attach a flag the caller raises when it stops waiting for the outcome.
    #[must_use]
    pub fn with_abandon_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.abandoned = Some(flag);
        self
    }

    /// Whether nobody waits for this request any more.
    pub fn is_abandoned(&self) -> bool {
        self.abandoned
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Consume the request and start its job.
    pub fn into_future(self) -> JobFuture {
        (self.job)()
    }
}

impl fmt::Debug for CallRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallRequest")
            .field("id", &self.id)
            .field("retry_count", &self.retry_count)
            .field("enqueued_at", &self.enqueued_at)
            .field("abandoned", &self.is_abandoned())
            .finish_non_exhaustive()
    }
}

/// Strict FIFO of call requests.
#[derive(Debug, Default)]
pub struct PendingQueue {
    requests: VecDeque<CallRequest>,
}

impl PendingQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail.
    pub fn push(&mut self, request: CallRequest) {
        self.requests.push_back(request);
    }

    /// Remove the head.
    pub fn pop(&mut self) -> Option<CallRequest> {
        self.requests.pop_front()
    }

    /// Inspect the head without removing it.
    pub fn peek(&self) -> Option<&CallRequest> {
        self.requests.front()
    }

    /// Number of queued requests.
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Remove every queued request, head first.
    pub fn drain(&mut self) -> Vec<CallRequest> {
        self.requests.drain(..).collect()
    }

    /// Remove abandoned requests sitting at the head.
    pub fn pop_abandoned(&mut self) -> Vec<CallRequest> {
        std::iter::from_fn(|| {
            if self.peek().is_some_and(CallRequest::is_abandoned) {
                self.pop()
            } else {
                None
            }
        })
        .collect()
    }
}
