//! Configuration models for the scheduler and curriculum runs.

pub mod app;
pub mod generation;
pub mod scheduler;

pub use app::{AppConfig, ConfigError};
pub use generation::GenerationConfig;
pub use scheduler::{RetryConfig, SchedulerConfig};
