//! Root application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{GenerationConfig, SchedulerConfig};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The file is not valid JSON for this schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Everything a curriculum run needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Call scheduler limits.
    pub scheduler: SchedulerConfig,
    /// Model and curriculum shape.
    pub generation: GenerationConfig,
    /// Directory lessons are written under.
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            generation: GenerationConfig::default(),
            output_dir: PathBuf::from("lessons"),
        }
    }
}

impl AppConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the failing section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scheduler
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("scheduler: {e}")))?;
        self.generation
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("generation: {e}")))?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_dir must not be empty".into()));
        }
        Ok(())
    }

    /// Parse from JSON and validate. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a parse or validation error.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from `path`, or use the defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an I/O, parse or validation error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            let cfg = Self::default();
            cfg.validate()?;
            return Ok(cfg);
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_json_str(&raw)
    }
}
