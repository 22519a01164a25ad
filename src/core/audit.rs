//! Audit sink implementations.
//!
//! The gate and the retry wrapper report every lifecycle step of a call to an
//! optional [`AuditSink`]. The in-memory sink keeps a bounded buffer and is
//! what tests use to check dispatch spacing and ordering.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::core::request::{CallId, CallState};

/// What happened to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// Entered the pending queue.
    Enqueue,
    /// Admitted by the gate and started.
    Dispatch,
    /// Completed successfully.
    Succeed,
    /// Failed; another attempt will be queued after a backoff.
    Retry,
    /// Failed with no retry budget left.
    Exhaust,
    /// Discarded from the queue on shutdown or because its caller left.
    Drop,
}

impl AuditAction {
    /// Call state the action leaves a call in; `None` once it is discarded.
    pub const fn resulting_state(self) -> Option<CallState> {
        match self {
            Self::Enqueue => Some(CallState::Queued),
            Self::Dispatch => Some(CallState::Dispatching),
            Self::Succeed => Some(CallState::Succeeded),
            Self::Retry => Some(CallState::FailedRetry),
            Self::Exhaust => Some(CallState::FailedTerminal),
            Self::Drop => None,
        }
    }
}

/// Audit event structure.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Related call identifier.
    pub call_id: CallId,
    /// Failures seen before this event.
    pub retry_count: u32,
    /// Action taken.
    pub action: AuditAction,
    /// When it happened.
    pub at: Instant,
}

impl AuditEvent {
    /// Build an event stamped with the current time.
    pub fn now(call_id: CallId, retry_count: u32, action: AuditAction) -> Self {
        Self {
            call_id,
            retry_count,
            action,
            at: Instant::now(),
        }
    }
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Cloning shares the underlying buffer, so a clone handed to the scheduler
/// can be inspected through the original.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Events with the given action, oldest first.
    pub fn with_action(&self, action: AuditAction) -> Vec<AuditEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }

    /// Call ids in dispatch order.
    pub fn dispatch_order(&self) -> Vec<CallId> {
        self.with_action(AuditAction::Dispatch)
            .into_iter()
            .map(|e| e.call_id)
            .collect()
    }

    /// Latest recorded state of call `call_id`.
    ///
    /// `None` if the call was never seen, its events were evicted, or it was
    /// dropped from the queue.
    pub fn last_state(&self, call_id: CallId) -> Option<CallState> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|e| e.call_id == call_id)
            .and_then(|e| e.action.resulting_state())
    }

    /// Dispatch instants, oldest first.
    pub fn dispatch_times(&self) -> Vec<Instant> {
        self.with_action(AuditAction::Dispatch)
            .into_iter()
            .map(|e| e.at)
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}
