//! Reservoir of dispatch permits with fixed-interval replenishment.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;

/// Periodic reset applied to a [`PermitPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh {
    /// Permits granted on every refresh (capped at the pool capacity).
    pub amount: u32,
    /// Time between two refreshes.
    pub interval: Duration,
}

/// Count of available call permits.
///
/// A pool built with [`PermitPool::unlimited`] never runs out. A bounded pool
/// starts full and is *reset* to `min(refresh.amount, capacity)` at every
/// refresh boundary; unused permits do not carry over.
///
/// A refreshing pool also remembers when its recent permits were spent. A
/// permit is only granted while fewer than `capacity` were taken in the last
/// `refresh.interval`, so a burst just before a boundary cannot be followed
/// by a second burst just after it.
#[derive(Debug, Clone)]
pub struct PermitPool {
    available: u32,
    capacity: u32,
    refresh: Option<Refresh>,
    next_refresh: Option<Instant>,
    recent: VecDeque<Instant>,
    unlimited: bool,
}

impl PermitPool {
    /// Pool that never blocks dispatch.
    pub const fn unlimited() -> Self {
        Self {
            available: u32::MAX,
            capacity: u32::MAX,
            refresh: None,
            next_refresh: None,
            recent: VecDeque::new(),
            unlimited: true,
        }
    }

    /// Bounded pool holding `capacity` permits at `now`.
    ///
    /// Refresh boundaries are anchored at `now`: the first one falls at
    /// `now + refresh.interval`.
    pub fn bounded(capacity: u32, refresh: Option<Refresh>, now: Instant) -> Self {
        Self {
            available: capacity,
            capacity,
            refresh,
            next_refresh: refresh.map(|r| now + r.interval),
            recent: VecDeque::new(),
            unlimited: false,
        }
    }

    /// Apply every refresh boundary that has passed by `now` and forget
    /// permits spent a full interval ago.
    pub fn refresh_if_due(&mut self, now: Instant) {
        let (Some(refresh), Some(mut next)) = (self.refresh, self.next_refresh) else {
            return;
        };
        while self
            .recent
            .front()
            .is_some_and(|&spent| spent + refresh.interval <= now)
        {
            self.recent.pop_front();
        }
        if now < next {
            return;
        }
        while next <= now {
            next += refresh.interval;
        }
        self.available = refresh.amount.min(self.capacity);
        self.next_refresh = Some(next);
        tracing::debug!(available = self.available, "reservoir refreshed");
    }

    /// Time until a permit can be taken, zero if one can be taken at `now`.
    ///
    /// `None` means the pool is empty and never refreshes. Call
    /// [`PermitPool::refresh_if_due`] with the same `now` first.
    pub fn time_until_permit(&self, now: Instant) -> Option<Duration> {
        if self.unlimited {
            return Some(Duration::ZERO);
        }
        let refresh_wait = if self.available > 0 {
            Duration::ZERO
        } else {
            self.next_refresh?.saturating_duration_since(now)
        };
        let window_wait = match (self.refresh, self.recent.front()) {
            (Some(refresh), Some(&oldest)) if self.window_full() => {
                (oldest + refresh.interval).saturating_duration_since(now)
            }
            _ => Duration::ZERO,
        };
        Some(refresh_wait.max(window_wait))
    }

    /// Take one permit at `now` if any is left and the window allows it.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        if self.unlimited {
            return true;
        }
        if self.available == 0 || self.window_full() {
            return false;
        }
        self.available -= 1;
        if self.refresh.is_some() {
            self.recent.push_back(now);
        }
        true
    }

    fn window_full(&self) -> bool {
        self.recent.len() >= self.capacity as usize
    }

    /// Permits currently available, `None` for an unlimited pool.
    pub const fn available(&self) -> Option<u32> {
        if self.unlimited {
            None
        } else {
            Some(self.available)
        }
    }

    /// Maximum permits held at once, `None` for an unlimited pool.
    pub const fn capacity(&self) -> Option<u32> {
        if self.unlimited {
            None
        } else {
            Some(self.capacity)
        }
    }
}
