//! Tests for builder modules

use std::time::Duration;

use prometheus_curriculum::builders::{build_scheduler, SchedulerBuilder};
use prometheus_curriculum::config::SchedulerConfig;
use prometheus_curriculum::runtime::TokioSpawner;

#[test]
fn test_scheduler_builder_defaults() {
    let builder = SchedulerBuilder::default();
    assert_eq!(builder.config(), &SchedulerConfig::unlimited());
}

#[test]
fn test_scheduler_builder_from_config() {
    let builder = SchedulerBuilder::from_config(SchedulerConfig::default()).max_retries(1);
    assert_eq!(builder.config().reservoir, Some(2));
    assert_eq!(builder.config().retry.max_retries, 1);
}

#[tokio::test]
async fn test_build_scheduler_uses_config_limits() {
    let cfg = SchedulerConfig::default();
    let scheduler = build_scheduler(&cfg, TokioSpawner::current().unwrap()).unwrap();

    assert_eq!(scheduler.gate().limits(), cfg.gate_limits());
    assert_eq!(scheduler.retry_policy().max_retries, 3);
    assert_eq!(
        scheduler.retry_policy().backoff.delay(1),
        Duration::from_millis(100)
    );
}

#[tokio::test]
async fn test_build_scheduler_rejects_invalid_config() {
    let cfg = SchedulerConfig {
        reservoir_refresh_amount: Some(0),
        ..SchedulerConfig::default()
    };
    assert!(build_scheduler(&cfg, TokioSpawner::current().unwrap()).is_err());
}
