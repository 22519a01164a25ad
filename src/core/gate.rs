//! Admission gate: FIFO queue, permit pool and dispatch spacing.
//!
//! Every call goes through [`AdmissionGate::submit`]. The request waits in a
//! strict FIFO queue until two independent conditions hold at once:
//!
//! - the [`PermitPool`] has a permit left in the current refresh window, and
//! - at least `min_time` has elapsed since the previous dispatch.
//!
//! The decision is taken by a single dispatch loop running as a background
//! task. It holds the gate state under one `parking_lot::Mutex`, so a permit
//! is never taken twice and the queue head is never popped twice. The loop is
//! event-driven: it sleeps until the next refresh or spacing deadline, or
//! until a new submission arrives.
//!
//! A caller that stops waiting leaves its request behind in the queue. The
//! loop discards such requests when they reach the head, before any permit is
//! spent on them.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{oneshot, Notify};
use tokio::time::Instant;

use crate::core::audit::{AuditAction, AuditEvent, AuditSink};
use crate::core::dispatch_clock::DispatchClock;
use crate::core::permit_pool::{PermitPool, Refresh};
use crate::core::request::{CallId, CallRequest, Job, JobFuture, PendingQueue};
use crate::core::spawn::Spawn;
use crate::core::SchedulerError;

/// Admission limits applied by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateLimits {
    /// Minimum time between two dispatches.
    pub min_time: Duration,
    /// Permits held at once; `None` disables the reservoir.
    pub reservoir: Option<u32>,
    /// Periodic reset of the reservoir.
    pub refresh: Option<Refresh>,
}

impl GateLimits {
    /// No spacing and no reservoir: every request is admitted immediately.
    pub const fn unlimited() -> Self {
        Self {
            min_time: Duration::ZERO,
            reservoir: None,
            refresh: None,
        }
    }

    fn permit_pool(&self, now: Instant) -> PermitPool {
        self.reservoir.map_or_else(PermitPool::unlimited, |capacity| {
            PermitPool::bounded(capacity, self.refresh, now)
        })
    }
}

/// Point-in-time view of the gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateStats {
    /// Requests waiting for admission.
    pub queued: usize,
    /// Permits left in the current window; `None` when unlimited.
    pub available_permits: Option<u32>,
    /// Attempts ever enqueued (retries included).
    pub submitted: u64,
    /// Attempts admitted and started.
    pub dispatched: u64,
    /// Attempts whose call has finished.
    pub completed: u64,
    /// Attempts started but not yet finished.
    pub in_flight: u64,
}

#[derive(Debug, Default)]
struct GateCounters {
    submitted: AtomicU64,
    dispatched: AtomicU64,
    completed: AtomicU64,
}

struct GateState {
    queue: PendingQueue,
    pool: PermitPool,
    clock: DispatchClock,
    closed: bool,
}

/// What the dispatch loop does next.
enum Step {
    Dispatch(CallRequest),
    Sleep(Duration),
    Park,
    Exit,
}

impl GateState {
    fn next_step(&mut self, now: Instant) -> Step {
        if self.closed {
            return Step::Exit;
        }
        if self.queue.is_empty() {
            return Step::Park;
        }

        self.pool.refresh_if_due(now);
        // Empty reservoir that never refreshes.
        let Some(permit_wait) = self.pool.time_until_permit(now) else {
            return Step::Park;
        };
        // Head stays queued until both deadlines have passed.
        let wait = permit_wait.max(self.clock.time_until_ready(now));
        if !wait.is_zero() {
            return Step::Sleep(wait);
        }
        if !self.pool.try_acquire(now) {
            return Step::Park;
        }
        self.clock.record(now);
        self.queue.pop().map_or(Step::Park, Step::Dispatch)
    }
}

struct Shared {
    limits: GateLimits,
    state: Mutex<GateState>,
    notify: Arc<Notify>,
    counters: Arc<GateCounters>,
    audit: Option<Arc<dyn AuditSink>>,
    next_id: AtomicU64,
}

impl Shared {
    fn audit(&self, call_id: CallId, retry_count: u32, action: AuditAction) {
        if let Some(sink) = &self.audit {
            sink.record(AuditEvent::now(call_id, retry_count, action));
        }
    }
}

/// Raises the request's abandon flag if the caller stops waiting early.
struct AbandonOnDrop {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
    armed: bool,
}

impl Drop for AbandonOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::Release);
            self.notify.notify_one();
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // Let a parked dispatch loop observe that every handle is gone.
        self.notify.notify_one();
    }
}

/// Rate-limiting admission gate shared by every caller.
///
/// Cloning is cheap and yields another handle to the same gate. The
/// background dispatch loop stops once every handle has been dropped or
/// [`AdmissionGate::shutdown`] has been called.
#[derive(Clone)]
pub struct AdmissionGate {
    shared: Arc<Shared>,
}

impl AdmissionGate {
    /// Create a gate and start its dispatch loop on `spawner`.
    pub fn new<S>(limits: GateLimits, spawner: S, audit: Option<Arc<dyn AuditSink>>) -> Self
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        let notify = Arc::new(Notify::new());
        let shared = Arc::new(Shared {
            limits,
            state: Mutex::new(GateState {
                queue: PendingQueue::new(),
                pool: limits.permit_pool(now),
                clock: DispatchClock::new(limits.min_time),
                closed: false,
            }),
            notify: Arc::clone(&notify),
            counters: Arc::new(GateCounters::default()),
            audit,
            next_id: AtomicU64::new(1),
        });

        tracing::debug!(
            min_time_ms = limits.min_time.as_millis(),
            reservoir = ?limits.reservoir,
            "admission gate started"
        );
        spawner.spawn(dispatch_loop(Arc::downgrade(&shared), notify, spawner.clone()));

        Self { shared }
    }

    /// Queue `thunk` and resolve to its outcome once it has been admitted and
    /// has run.
    ///
    /// The thunk is not invoked until the gate dispatches it. Its error is
    /// returned unchanged; `E` only needs to absorb the gate's own lifecycle
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns the call's own error, or `SchedulerError::Shutdown` /
    /// `SchedulerError::Dropped` converted into `E`.
    pub async fn submit<F, Fut, T, E>(&self, thunk: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: From<SchedulerError> + Send + 'static,
    {
        let id = self.next_call_id();
        match self.run_attempt(id, 0, thunk).await {
            Ok(outcome) => outcome,
            Err(e) => Err(E::from(e)),
        }
    }

    /// Queue one attempt of call `id` and wait for its output.
    ///
    /// Dropping the returned future before the attempt is dispatched removes
    /// it from the queue without spending a permit.
    pub(crate) async fn run_attempt<F, Fut, R>(
        &self,
        id: CallId,
        retry_count: u32,
        thunk: F,
    ) -> Result<R, SchedulerError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let flag = Arc::new(AtomicBool::new(false));
        let rx = self.enqueue(id, retry_count, Arc::clone(&flag), thunk)?;
        let mut guard = AbandonOnDrop {
            flag,
            notify: Arc::clone(&self.shared.notify),
            armed: true,
        };
        let outcome = rx.await;
        guard.armed = false;
        outcome.map_err(|_| SchedulerError::Dropped(id))
    }

    fn enqueue<F, Fut, R>(
        &self,
        id: CallId,
        retry_count: u32,
        abandoned: Arc<AtomicBool>,
        thunk: F,
    ) -> Result<oneshot::Receiver<R>, SchedulerError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let counters = Arc::clone(&self.shared.counters);
        let job: Job = Box::new(move || -> JobFuture {
            Box::pin(async move {
                let outcome = thunk().await;
                counters.completed.fetch_add(1, Ordering::Relaxed);
                // The caller may have stopped waiting.
                let _ = tx.send(outcome);
            })
        });

        let queued = {
            let mut state = self.shared.state.lock();
            if state.closed {
                return Err(SchedulerError::Shutdown);
            }
            state.queue.push(
                CallRequest::new(id, retry_count, Instant::now(), job).with_abandon_flag(abandoned),
            );
            state.queue.len()
        };
        self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
        self.record(id, retry_count, AuditAction::Enqueue);
        tracing::debug!(call_id = id, retry_count, queued, "call enqueued");

        self.shared.notify.notify_one();
        Ok(rx)
    }

    /// Allocate a correlation id for a new logical call.
    pub(crate) fn next_call_id(&self) -> CallId {
        self.shared.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn record(&self, call_id: CallId, retry_count: u32, action: AuditAction) {
        self.shared.audit(call_id, retry_count, action);
    }

    /// Limits this gate was built with.
    pub fn limits(&self) -> GateLimits {
        self.shared.limits
    }

    /// Snapshot of queue depth, permits and counters.
    ///
    /// The permit count reflects the last refresh applied by the dispatch
    /// loop.
    pub fn stats(&self) -> GateStats {
        let (queued, available_permits) = {
            let state = self.shared.state.lock();
            (state.queue.len(), state.pool.available())
        };
        let counters = &self.shared.counters;
        let submitted = counters.submitted.load(Ordering::Relaxed);
        let dispatched = counters.dispatched.load(Ordering::Relaxed);
        let completed = counters.completed.load(Ordering::Relaxed);
        GateStats {
            queued,
            available_permits,
            submitted,
            dispatched,
            completed,
            in_flight: dispatched.saturating_sub(completed),
        }
    }

    /// Stop admitting work and drop every queued request.
    ///
    /// Callers waiting on a dropped request receive
    /// `SchedulerError::Dropped`; later submissions fail with
    /// `SchedulerError::Shutdown`. Calls already dispatched keep running.
    /// Returns the number of dropped requests.
    pub fn shutdown(&self) -> usize {
        let dropped: Vec<CallRequest> = {
            let mut state = self.shared.state.lock();
            state.closed = true;
            state.queue.drain()
        };
        for request in &dropped {
            self.record(request.id, request.retry_count, AuditAction::Drop);
        }
        tracing::debug!(dropped = dropped.len(), "admission gate shut down");
        self.shared.notify.notify_one();
        dropped.len()
    }

    /// Whether [`AdmissionGate::shutdown`] has been called.
    pub fn is_shutdown(&self) -> bool {
        self.shared.state.lock().closed
    }
}

/// Background loop that admits queued requests one at a time.
async fn dispatch_loop<S>(shared: Weak<Shared>, notify: Arc<Notify>, spawner: S)
where
    S: Spawn + Send + Sync + 'static,
{
    loop {
        let step = {
            let Some(shared) = shared.upgrade() else {
                break;
            };
            let (abandoned, step) = {
                let mut state = shared.state.lock();
                let abandoned = state.queue.pop_abandoned();
                (abandoned, state.next_step(Instant::now()))
            };
            for request in &abandoned {
                shared.audit(request.id, request.retry_count, AuditAction::Drop);
                tracing::debug!(
                    call_id = request.id,
                    retry_count = request.retry_count,
                    "abandoned call discarded"
                );
            }
            if let Step::Dispatch(request) = step {
                shared.counters.dispatched.fetch_add(1, Ordering::Relaxed);
                shared.audit(request.id, request.retry_count, AuditAction::Dispatch);
                tracing::debug!(
                    call_id = request.id,
                    retry_count = request.retry_count,
                    waited_ms = request.enqueued_at.elapsed().as_millis(),
                    "call dispatched"
                );
                spawner.spawn(request.into_future());
                continue;
            }
            step
        };

        match step {
            Step::Sleep(delay) => {
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = notify.notified() => {}
                }
            }
            Step::Park => notify.notified().await,
            Step::Exit | Step::Dispatch(_) => break,
        }
    }
    tracing::debug!("dispatch loop stopped");
}
