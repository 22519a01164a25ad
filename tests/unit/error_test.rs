//! Tests for error types

use prometheus_curriculum::config::ConfigError;
use prometheus_curriculum::core::SchedulerError;
use prometheus_curriculum::curriculum::GenerationError;
use prometheus_curriculum::generation::ApiError;

#[test]
fn test_shutdown_error() {
    let err = SchedulerError::Shutdown;
    assert_eq!(format!("{}", err), "scheduler shut down");
}

#[test]
fn test_dropped_error() {
    let err = SchedulerError::Dropped(7);
    assert_eq!(format!("{}", err), "call 7 dropped before completion");
}

#[test]
fn test_invalid_config_error() {
    let err = SchedulerError::InvalidConfig("reservoir must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: reservoir must be greater than 0"
    );
}

#[test]
fn test_generation_error_is_transparent() {
    let err = GenerationError::from(ApiError::MissingApiKey("OPENAI_API_KEY"));
    assert_eq!(err.to_string(), ApiError::MissingApiKey("OPENAI_API_KEY").to_string());

    let err = GenerationError::from(SchedulerError::Shutdown);
    assert_eq!(err.to_string(), "scheduler shut down");
}

#[test]
fn test_config_parse_error() {
    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err = ConfigError::from(err);
    assert!(format!("{}", err).starts_with("parse error:"));
}
