//! # Prometheus Curriculum
//!
//! A rate-limited, retrying call scheduler and the curriculum generator built on it.
//!
//! Calls to a metered text-generation API are funneled through a single admission gate
//! that enforces a minimum spacing between dispatches and an optional permit reservoir
//! refilled on a fixed interval. Calls that arrive while the gate is closed are parked in
//! FIFO order and dispatched one at a time as soon as both constraints allow. A retry
//! wrapper re-submits failed calls through the same gate after an exponential delay, so
//! retries count against the same budget as first attempts.
//!
//! ## Key Features
//!
//! - **Deferred Dispatch**: The call's thunk is not invoked until the gate admits it
//! - **Spacing + Reservoir**: `min_time` between dispatch starts, `reservoir` permits per refresh window
//! - **FIFO Admission**: Pending calls leave the queue in the order they were submitted
//! - **Exponential Retry**: `base * 2^n` delays with a configurable retry limit
//! - **Auditing**: Optional sink recording enqueue, dispatch and retry events
//!
//! ## CallScheduler
//!
//! ```rust,ignore
//! use prometheus_curriculum::builders::SchedulerBuilder;
//! use std::time::Duration;
//!
//! // Two calls per minute, at least 30s apart, three retries from a 50ms base.
//! let scheduler = SchedulerBuilder::new()
//!     .min_time(Duration::from_secs(30))
//!     .reservoir(2)
//!     .reservoir_refresh(2, Duration::from_secs(60))
//!     .max_retries(3)
//!     .base_delay(Duration::from_millis(50))
//!     .build()?;
//!
//! let text = scheduler
//!     .call_with_retry(|| async { client.complete("prompt").await })
//!     .await?;
//! ```
//!
//! ## CurriculumGenerator
//!
//! ```rust,ignore
//! use prometheus_curriculum::curriculum::CurriculumGenerator;
//! use prometheus_curriculum::generation::OpenAiClient;
//! use prometheus_curriculum::infra::FileLessonStore;
//!
//! let generator = CurriculumGenerator::new(
//!     scheduler,
//!     Arc::new(OpenAiClient::from_env(&config.generation.api_base_url)?),
//!     Arc::new(FileLessonStore::new("lessons")),
//!     config.generation.clone(),
//! );
//! let curriculum = generator.generate("Next.js Programming").await?;
//! ```
//!
//! For complete examples, see:
//! - `tests/admission_gate_test.rs` - Rate limiting integration tests
//! - `src/bin/curriculum.rs` - Command-line entry point

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: admission gate, permits, spacing and retries.
pub mod core;
/// Configuration models for the scheduler and curriculum runs.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Infrastructure adapters for lesson storage.
pub mod infra;
/// Runtime adapters that let the gate spawn its dispatch loop.
pub mod runtime;
/// Shared utilities.
pub mod util;
/// Text-generation client seam.
pub mod generation;
/// Curriculum prompts, model and generator.
pub mod curriculum;
