//! Injected dependencies for the packing session.

use std::time::Duration;

use chrono::{DateTime, Utc};
use scanpack_core::environment::Clock;

/// Durations for the session's three timer concerns.
///
/// Defaults match the demo widget: a quick flash for a counted scan, a
/// slightly longer one for a wrong-item scan, and 2.5s each for toast
/// dismissal and the post-finalize auto-reset. Tests inject much shorter
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// Decay of the success flash after a counted scan
    pub scan_flash: Duration,
    /// Decay of the error flash after a wrong-item scan
    pub error_flash: Duration,
    /// Dismissal of the address-update toast
    pub toast: Duration,
    /// Auto-reset of a finalized session
    pub auto_reset: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            scan_flash: Duration::from_millis(600),
            error_flash: Duration::from_millis(800),
            toast: Duration::from_millis(2500),
            auto_reset: Duration::from_millis(2500),
        }
    }
}

impl SessionTimings {
    /// All four durations set to `duration`; handy in tests
    #[must_use]
    pub const fn uniform(duration: Duration) -> Self {
        Self {
            scan_flash: duration,
            error_flash: duration,
            toast: duration,
            auto_reset: duration,
        }
    }
}

/// System clock for production use
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Packing session environment
///
/// The session needs exactly two things from the outside world: a clock for
/// the finalized-at timestamp and the timer durations.
#[derive(Debug, Clone)]
pub struct PackingEnvironment<C: Clock> {
    /// Clock for timestamping state transitions
    pub clock: C,
    /// Timer durations for flash, toast and auto-reset
    pub timings: SessionTimings,
}

impl<C: Clock> PackingEnvironment<C> {
    /// Create an environment with default timings
    #[must_use]
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            timings: SessionTimings::default(),
        }
    }

    /// Override the timer durations
    #[must_use]
    pub const fn with_timings(mut self, timings: SessionTimings) -> Self {
        self.timings = timings;
        self
    }
}
