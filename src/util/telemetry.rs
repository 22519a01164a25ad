//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: progress from this crate, warnings
/// from everything else.
pub const DEFAULT_LOG_FILTER: &str = "warn,prometheus_curriculum=info";

/// Initialize tracing/telemetry. Users can install their own subscriber; this
/// helper installs a fmt subscriber filtered by `RUST_LOG` if none is set.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .try_init();
}

/// `RUST_LOG` if it parses, otherwise [`DEFAULT_LOG_FILTER`].
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
