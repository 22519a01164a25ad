//! Integration tests for retries through the call scheduler.
//!
//! Retries go back through the admission gate, so these tests check both the
//! backoff arithmetic and that a retried attempt waits its turn like any other
//! request.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use prometheus_curriculum::builders::SchedulerBuilder;
use prometheus_curriculum::core::{
    AuditAction, CallScheduler, CallState, InMemoryAuditSink, SchedulerError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
enum CallError {
    Gate(SchedulerError),
    /// Failure reported on the given attempt number (1-based).
    Attempt(u32),
}

impl From<SchedulerError> for CallError {
    fn from(e: SchedulerError) -> Self {
        Self::Gate(e)
    }
}

/// Thunk that fails its first `failures` attempts, then returns the attempt
/// number.
fn flaky(
    failures: u32,
    attempts: Arc<AtomicU32>,
) -> impl Fn() -> futures::future::Ready<Result<u32, CallError>> + Send + Sync + 'static {
    move || {
        let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= failures {
            futures::future::ready(Err(CallError::Attempt(attempt)))
        } else {
            futures::future::ready(Ok(attempt))
        }
    }
}

fn scheduler(max_retries: u32, base_ms: u64) -> (CallScheduler, InMemoryAuditSink) {
    let sink = InMemoryAuditSink::new(1024);
    let scheduler = SchedulerBuilder::new()
        .max_retries(max_retries)
        .base_delay(Duration::from_millis(base_ms))
        .audit(Arc::new(sink.clone()))
        .build()
        .expect("valid scheduler");
    (scheduler, sink)
}

#[tokio::test(start_paused = true)]
async fn test_three_failures_then_success_waits_700ms() {
    let (scheduler, _sink) = scheduler(3, 50);
    let attempts = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let result = scheduler
        .call_with_retry(flaky(3, Arc::clone(&attempts)))
        .await;

    assert_eq!(result, Ok(4));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
    assert_eq!(start.elapsed(), Duration::from_millis(700));
}

#[tokio::test(start_paused = true)]
async fn test_k_failures_requeue_k_times_with_doubling_delays() {
    let (scheduler, sink) = scheduler(3, 50);
    let attempts = Arc::new(AtomicU32::new(0));

    let result = scheduler
        .call_with_retry(flaky(2, Arc::clone(&attempts)))
        .await;
    assert_eq!(result, Ok(3));

    let retries: Vec<u32> = sink
        .with_action(AuditAction::Retry)
        .into_iter()
        .map(|e| e.retry_count)
        .collect();
    assert_eq!(retries, vec![1, 2]);

    let dispatches = sink.with_action(AuditAction::Dispatch);
    assert_eq!(dispatches.len(), 3);
    assert!(dispatches.iter().all(|e| e.call_id == 1));
    assert_eq!(dispatches[1].at - dispatches[0].at, Duration::from_millis(100));
    assert_eq!(dispatches[2].at - dispatches[1].at, Duration::from_millis(200));
    assert_eq!(sink.with_action(AuditAction::Succeed).len(), 1);
    assert_eq!(sink.last_state(1), Some(CallState::Succeeded));
}

#[tokio::test(start_paused = true)]
async fn test_always_failing_returns_last_error_after_max_retries() {
    let (scheduler, sink) = scheduler(3, 50);
    let attempts = Arc::new(AtomicU32::new(0));

    let result = scheduler
        .call_with_retry(flaky(u32::MAX, Arc::clone(&attempts)))
        .await;

    assert_eq!(result, Err(CallError::Attempt(4)));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
    assert_eq!(sink.with_action(AuditAction::Retry).len(), 3);
    let exhausted = sink.with_action(AuditAction::Exhaust);
    assert_eq!(exhausted.len(), 1);
    assert_eq!(exhausted[0].retry_count, 3);
    assert_eq!(sink.last_state(1), Some(CallState::FailedTerminal));
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_runs_once() {
    let (scheduler, _sink) = scheduler(0, 50);
    let attempts = Arc::new(AtomicU32::new(0));

    let result = scheduler
        .call_with_retry(flaky(1, Arc::clone(&attempts)))
        .await;

    assert_eq!(result, Err(CallError::Attempt(1)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_per_call_retry_budget() {
    let (scheduler, _sink) = scheduler(3, 50);
    let attempts = Arc::new(AtomicU32::new(0));

    let result = scheduler
        .call_with_max_retries(flaky(u32::MAX, Arc::clone(&attempts)), 1)
        .await;

    assert_eq!(result, Err(CallError::Attempt(2)));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert_eq!(scheduler.retry_policy().max_retries, 3);
}

#[tokio::test(start_paused = true)]
async fn test_retry_waits_for_gate_spacing() {
    let sink = InMemoryAuditSink::new(64);
    let scheduler = SchedulerBuilder::new()
        .min_time(Duration::from_secs(1))
        .max_retries(2)
        .base_delay(Duration::from_millis(10))
        .audit(Arc::new(sink.clone()))
        .build()
        .unwrap();
    let attempts = Arc::new(AtomicU32::new(0));

    let result = scheduler
        .call_with_retry(flaky(1, Arc::clone(&attempts)))
        .await;

    assert_eq!(result, Ok(2));
    let times = sink.dispatch_times();
    assert_eq!(times[1] - times[0], Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_retry_rejoins_queue_tail() {
    let sink = InMemoryAuditSink::new(64);
    let scheduler = SchedulerBuilder::new()
        .min_time(Duration::from_millis(100))
        .max_retries(1)
        .base_delay(Duration::from_millis(5))
        .audit(Arc::new(sink.clone()))
        .build()
        .unwrap();

    let first = scheduler.call_with_retry(flaky(1, Arc::new(AtomicU32::new(0))));
    let second = scheduler.call_with_retry(flaky(0, Arc::new(AtomicU32::new(0))));
    let third = scheduler.call_with_retry(flaky(0, Arc::new(AtomicU32::new(0))));
    let (a, b, c) = tokio::join!(first, second, third);

    assert_eq!(a, Ok(2));
    assert_eq!(b, Ok(1));
    assert_eq!(c, Ok(1));
    assert_eq!(sink.dispatch_order(), vec![1, 2, 3, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_custom_retry_delay() {
    let scheduler = SchedulerBuilder::new()
        .max_retries(2)
        .retry_delay(|n| Duration::from_secs(u64::from(n)))
        .build()
        .unwrap();
    let start = Instant::now();

    let result = scheduler
        .call_with_retry(flaky(2, Arc::new(AtomicU32::new(0))))
        .await;

    assert_eq!(result, Ok(3));
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_during_backoff_surfaces_as_gate_error() {
    let (scheduler, _sink) = scheduler(3, 1_000);
    let attempts = Arc::new(AtomicU32::new(0));

    let handle = {
        let scheduler = scheduler.clone();
        let attempts = Arc::clone(&attempts);
        tokio::spawn(async move { scheduler.call_with_retry(flaky(u32::MAX, attempts)).await })
    };
    while attempts.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    scheduler.shutdown();

    assert_eq!(
        handle.await.unwrap(),
        Err(CallError::Gate(SchedulerError::Shutdown))
    );
}

#[tokio::test(start_paused = true)]
async fn test_randomized_failure_schedules() {
    let mut rng = StdRng::seed_from_u64(42);
    let (scheduler, _sink) = scheduler(3, 50);

    let plans: Vec<u32> = (0..16).map(|_| rng.random_range(0..=4)).collect();
    let calls = plans
        .iter()
        .map(|&failures| scheduler.call_with_retry(flaky(failures, Arc::new(AtomicU32::new(0)))));
    let results = join_all(calls).await;

    for (failures, result) in plans.into_iter().zip(results) {
        if failures <= 3 {
            assert_eq!(result, Ok(failures + 1));
        } else {
            assert_eq!(result, Err(CallError::Attempt(4)));
        }
    }
}
