//! Minimum spacing between two dispatches.

use std::time::Duration;

use tokio::time::Instant;

/// Tracks when the last call was dispatched.
#[derive(Debug, Clone)]
pub struct DispatchClock {
    min_time: Duration,
    last_dispatch: Option<Instant>,
}

impl DispatchClock {
    /// Clock enforcing `min_time` between dispatches.
    pub const fn new(min_time: Duration) -> Self {
        Self {
            min_time,
            last_dispatch: None,
        }
    }

    /// Configured spacing.
    pub const fn min_time(&self) -> Duration {
        self.min_time
    }

    /// Instant of the most recent dispatch.
    pub const fn last_dispatch(&self) -> Option<Instant> {
        self.last_dispatch
    }

    /// Time left before another dispatch is allowed; zero when ready.
    pub fn time_until_ready(&self, now: Instant) -> Duration {
        self.last_dispatch
            .map_or(Duration::ZERO, |last| {
                (last + self.min_time).saturating_duration_since(now)
            })
    }

    /// Stamp a dispatch.
    pub fn record(&mut self, now: Instant) {
        self.last_dispatch = Some(now);
    }
}
