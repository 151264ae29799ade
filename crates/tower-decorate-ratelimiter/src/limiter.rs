use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// How admissions are spread over the interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowType {
    /// Admissions are spaced `interval / max_per_interval` apart.
    ///
    /// No rolling window of length `interval` ever holds more than
    /// `max_per_interval` admissions, and bursts are smoothed out.
    #[default]
    Smooth,
    /// Up to `max_per_interval` admissions per window; the window restarts
    /// when it has elapsed or is full.
    ///
    /// Allows bursts of `max_per_interval` at the start of every window.
    Fixed,
}

/// Internal state for the rate limiter.
#[derive(Debug)]
pub(crate) struct RateLimiterState {
    max_per_interval: u32,
    interval: Duration,
    window_type: WindowType,
    /// Start of the current fixed window. May lie in the future once the
    /// present window is fully reserved.
    window_start: Instant,
    /// Admissions reserved in the current fixed window.
    admitted: u32,
    /// Earliest instant the next smooth admission may happen.
    next_slot: Instant,
}

impl RateLimiterState {
    pub(crate) fn new(
        max_per_interval: u32,
        interval: Duration,
        window_type: WindowType,
        now: Instant,
    ) -> Self {
        Self {
            max_per_interval,
            interval,
            window_type,
            window_start: now,
            admitted: 0,
            next_slot: now,
        }
    }

    /// Reserves the next admission and returns when it takes effect.
    ///
    /// Reservations are handed out in call order; the returned instant is
    /// never earlier than `now`.
    pub(crate) fn reserve(&mut self, now: Instant) -> Instant {
        match self.window_type {
            WindowType::Smooth => {
                let slot = self.next_slot.max(now);
                self.next_slot = advance(slot, self.spacing());
                slot
            }
            WindowType::Fixed => {
                // A window whose end is past the clock's range never elapses.
                let elapsed = self
                    .window_start
                    .checked_add(self.interval)
                    .is_some_and(|end| now >= end);
                if elapsed {
                    self.window_start = now;
                    self.admitted = 0;
                }
                if self.admitted >= self.max_per_interval {
                    self.window_start = advance(self.window_start, self.interval);
                    self.admitted = 0;
                }
                self.admitted += 1;
                self.window_start.max(now)
            }
        }
    }

    /// Gap between smooth admissions. Rounded up: `max_per_interval` gaps
    /// always span at least `interval`.
    fn spacing(&self) -> Duration {
        let nanos = self
            .interval
            .as_nanos()
            .div_ceil(u128::from(self.max_per_interval));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    #[cfg(test)]
    fn admitted(&self) -> u32 {
        self.admitted
    }
}

/// Roughly 30 years; stands in for an instant the clock cannot represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `at + by`, saturating to a far-future instant instead of overflowing.
fn advance(at: Instant, by: Duration) -> Instant {
    at.checked_add(by)
        .or_else(|| at.checked_add(FAR_FUTURE))
        .unwrap_or(at)
}

/// Rate limiter state shared by every clone of one wrapped service.
#[derive(Debug, Clone)]
pub(crate) struct SharedRateLimiter {
    state: Arc<Mutex<RateLimiterState>>,
}

impl SharedRateLimiter {
    pub(crate) fn new(max_per_interval: u32, interval: Duration, window_type: WindowType) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimiterState::new(
                max_per_interval,
                interval,
                window_type,
                Instant::now(),
            ))),
        }
    }

    /// Reserves an admission slot for a call made now.
    pub(crate) fn reserve(&self) -> Instant {
        let now = Instant::now();
        // Each reservation is a single assignment pair, so poisoning cannot
        // leave the state inconsistent.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.reserve(now)
    }

    /// Suspends until `slot` and returns how long the caller waited.
    pub(crate) async fn wait_for(slot: Instant) -> Duration {
        let now = Instant::now();
        if slot <= now {
            return Duration::ZERO;
        }
        sleep_until(slot).await;
        slot - now
    }
}
