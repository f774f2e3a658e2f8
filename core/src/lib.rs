//! # Scanpack Core
//!
//! Core traits and types for the scanpack architecture.
//!
//! Scanpack models interactive sessions (the scan-to-pack demo being the
//! canonical one) as a single-owner state machine driven by a reducer:
//!
//! - **State**: domain state for one mounted session
//! - **Action**: every possible input (user events and elapsed timers)
//! - **Reducer**: pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: side effect descriptions (not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden timers or I/O)
//! - Dependency Injection via Environment
//!
//! The one correctness-sensitive contract in this architecture is timer
//! discipline: every scheduled delay carries a named [`effect::EffectId`] so
//! the runtime can cancel it on supersession (a newer event of the same
//! class) and on teardown. Reducers express that discipline with
//! [`Effect::debounce`](effect::Effect::debounce) rather than ad hoc delayed
//! callbacks.
//!
//! ## Example
//!
//! ```ignore
//! use scanpack_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for SessionReducer {
//!     type State = SessionState;
//!     type Action = SessionAction;
//!     type Environment = SessionEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SessionState,
//!         action: SessionAction,
//!         env: &SessionEnvironment,
//!     ) -> SmallVec<[Effect<SessionAction>; 4]> {
//!         match action {
//!             SessionAction::Ping => {
//!                 state.flash = true;
//!                 smallvec![Effect::debounce(
//!                     FLASH_TIMER,
//!                     Duration::from_millis(600),
//!                     SessionAction::FlashElapsed,
//!                 )]
//!             }
//!             SessionAction::FlashElapsed => {
//!                 state.flash = false;
//!                 smallvec![Effect::None]
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They contain all decision logic and are deterministic and testable; the
/// runtime owns execution of the effects they return.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for session logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    ///
    /// Invalid operations (an action that is not legal in the current state)
    /// are expressed as silent no-ops: leave the state untouched and return
    /// `smallvec![Effect::None]`. Reducers never error and never panic.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action against the current state
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime. They are
/// values (not execution) and are composable and cancellable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Named handle for a cancellable effect.
    ///
    /// One id per concern: scheduling a new cancellable effect under an id
    /// that is already in flight aborts the older one (last-write-wins).
    /// Ids are `&'static str` backed so declaring them is free:
    ///
    /// ```
    /// use scanpack_core::effect::EffectId;
    ///
    /// const FLASH_TIMER: EffectId = EffectId::new("session.flash");
    /// assert_eq!(FLASH_TIMER.as_str(), "session.flash");
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct EffectId(&'static str);

    impl EffectId {
        /// Create a new effect id from a static name
        #[must_use]
        pub const fn new(name: &'static str) -> Self {
            Self(name)
        }

        /// The name this id was created with
        #[must_use]
        pub const fn as_str(&self) -> &'static str {
            self.0
        }
    }

    impl std::fmt::Display for EffectId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the Store
    /// runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    #[allow(missing_docs)]
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (timers, decay of transient state)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after the delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into
        /// the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

        /// A cancellable effect registered under a named id
        ///
        /// Scheduling a `Cancellable` aborts any in-flight effect already
        /// registered under the same id, then runs the inner effect. The
        /// runtime also aborts every registered effect on teardown.
        Cancellable {
            /// Registration handle for supersession and teardown
            id: EffectId,
            /// The effect to run under that handle
            effect: Box<Effect<Action>>,
        },

        /// Abort the in-flight effect registered under `id`, if any
        Cancel(EffectId),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
                Effect::Cancellable { id, effect } => f
                    .debug_struct("Effect::Cancellable")
                    .field("id", id)
                    .field("effect", effect)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Dispatch `action` after `duration`
        #[must_use]
        pub fn delay(duration: Duration, action: Action) -> Effect<Action> {
            Effect::Delay {
                duration,
                action: Box::new(action),
            }
        }

        /// Register `effect` under a named cancellation handle
        #[must_use]
        pub fn cancellable(id: EffectId, effect: Effect<Action>) -> Effect<Action> {
            Effect::Cancellable {
                id,
                effect: Box::new(effect),
            }
        }

        /// Cancel-then-reschedule a delayed action under a named handle
        ///
        /// The canonical timer operation: any pending delay registered under
        /// `id` is aborted and replaced by a fresh one, so at most one timer
        /// per concern is ever in flight.
        #[must_use]
        pub fn debounce(id: EffectId, duration: Duration, action: Action) -> Effect<Action> {
            Effect::cancellable(id, Effect::delay(duration, action))
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter. The packing session only needs time.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// Production environments inject a system clock; tests inject a fixed
    /// clock so timestamps (e.g. when a session was finalized) are
    /// deterministic.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)] // Test code

    use super::effect::{Effect, EffectId};
    use std::time::Duration;

    const TEST_TIMER: EffectId = EffectId::new("test.timer");

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Tick,
    }

    #[test]
    fn effect_id_display_matches_name() {
        assert_eq!(TEST_TIMER.to_string(), "test.timer");
        assert_eq!(TEST_TIMER.as_str(), "test.timer");
    }

    #[test]
    fn effect_ids_compare_by_name() {
        assert_eq!(TEST_TIMER, EffectId::new("test.timer"));
        assert_ne!(TEST_TIMER, EffectId::new("test.other"));
    }

    #[test]
    fn debounce_wraps_a_delay_under_the_id() {
        let effect = Effect::debounce(TEST_TIMER, Duration::from_millis(600), TestAction::Tick);

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, TEST_TIMER);
                match *effect {
                    Effect::Delay { duration, action } => {
                        assert_eq!(duration, Duration::from_millis(600));
                        assert_eq!(*action, TestAction::Tick);
                    },
                    other => panic!("expected Effect::Delay, got {other:?}"),
                }
            },
            other => panic!("expected Effect::Cancellable, got {other:?}"),
        }
    }

    #[test]
    fn merge_and_chain_preserve_order() {
        let merged: Effect<TestAction> = Effect::merge(vec![Effect::None, Effect::None]);
        assert!(matches!(merged, Effect::Parallel(ref effects) if effects.len() == 2));

        let chained: Effect<TestAction> = Effect::chain(vec![Effect::None]);
        assert!(matches!(chained, Effect::Sequential(ref effects) if effects.len() == 1));
    }

    #[test]
    fn debug_output_names_the_variant() {
        let cancel: Effect<TestAction> = Effect::Cancel(TEST_TIMER);
        assert_eq!(format!("{cancel:?}"), "Effect::Cancel(EffectId(\"test.timer\"))");
    }
}
