//! # Scanpack Testing
//!
//! Testing utilities and helpers for the scanpack architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits (deterministic clocks)
//! - A fluent Given-When-Then harness for reducers
//! - Assertion helpers for effect vectors
//!
//! ## Example
//!
//! ```ignore
//! use scanpack_testing::{ReducerTest, test_clock};
//!
//! ReducerTest::new(PackingReducer::new())
//!     .with_env(PackingEnvironment::new(test_clock()))
//!     .given_state(PackingState::demo())
//!     .when_action(PackingAction::Scan { item_id: "item-1".into() })
//!     .then_state(|state| assert_eq!(state.total_scanned(), 1))
//!     .run();
//! ```

mod reducer_test;

use chrono::{DateTime, Utc};
use scanpack_core::environment::Clock;

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use scanpack_testing::mocks::FixedClock;
    /// use scanpack_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2026-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};
