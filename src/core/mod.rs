//! Core scheduling abstractions: permits, spacing, queueing and retries.

pub mod audit;
pub mod dispatch_clock;
pub mod error;
pub mod gate;
pub mod permit_pool;
pub mod request;
pub mod retry;
pub mod scheduler;
pub mod spawn;

pub use audit::{AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use dispatch_clock::DispatchClock;
pub use error::{AppResult, SchedulerError};
pub use gate::{AdmissionGate, GateLimits, GateStats};
pub use permit_pool::{PermitPool, Refresh};
pub use request::{CallId, CallRequest, CallState, Job, JobFuture, PendingQueue};
pub use retry::{Backoff, RetryDelayFn, RetryPolicy};
pub use scheduler::CallScheduler;
pub use spawn::Spawn;
