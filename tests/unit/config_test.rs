//! Tests for configuration loading

use std::path::{Path, PathBuf};

use prometheus_curriculum::config::{AppConfig, ConfigError, GenerationConfig, SchedulerConfig};

#[test]
fn test_app_config_defaults() {
    let cfg = AppConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.output_dir, PathBuf::from("lessons"));
    assert_eq!(cfg.scheduler, SchedulerConfig::default());
    assert_eq!(cfg.generation.model, "text-davinci-002");
    assert_eq!(cfg.generation.max_tokens, 1024);
    assert_eq!(cfg.generation.category_count, 30);
    assert_eq!(cfg.generation.subtopic_count, 10);
}

#[test]
fn test_load_without_path_uses_defaults() {
    let cfg = AppConfig::load(None).unwrap();
    assert_eq!(cfg, AppConfig::default());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("curriculum.json");
    std::fs::write(
        &path,
        r#"{
            "scheduler": { "min_time_ms": 1000, "reservoir": 5,
                           "reservoir_refresh_amount": 5,
                           "reservoir_refresh_interval_ms": 10000 },
            "generation": { "category_count": 3 },
            "output_dir": "out"
        }"#,
    )
    .unwrap();

    let cfg = AppConfig::load(Some(&path)).unwrap();
    assert_eq!(cfg.scheduler.min_time_ms, 1000);
    assert_eq!(cfg.scheduler.reservoir, Some(5));
    assert_eq!(cfg.scheduler.retry.max_retries, 3);
    assert_eq!(cfg.generation.category_count, 3);
    assert_eq!(cfg.generation.subtopic_count, 10);
    assert_eq!(cfg.output_dir, Path::new("out"));
}

#[test]
fn test_load_missing_file_reports_path() {
    let err = AppConfig::load(Some(Path::new("/nonexistent/curriculum.json"))).unwrap_err();
    match err {
        ConfigError::Io { path, .. } => assert!(path.ends_with("curriculum.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_section_is_named() {
    let err = AppConfig::from_json_str(r#"{ "scheduler": { "reservoir": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.starts_with("scheduler:")));

    let err = AppConfig::from_json_str(r#"{ "generation": { "model": " " } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.starts_with("generation:")));
}

#[test]
fn test_generation_config_validation() {
    let cfg = GenerationConfig {
        subtopic_count: 0,
        ..GenerationConfig::default()
    };
    assert!(cfg.validate().is_err());
}
