//! # Scanpack Runtime
//!
//! Runtime implementation for the scanpack architecture.
//!
//! The [`Store`] coordinates a reducer, its state, and its environment:
//! actions go in through [`Store::send`], the reducer runs synchronously
//! under a write lock, and the effects it returns are executed on spawned
//! tasks. Actions produced by effects (elapsed timers, completed futures)
//! are fed back through `send`, so every mutation is linearized at the
//! reducer.
//!
//! ## Timer discipline
//!
//! `Effect::Cancellable { id, .. }` registers the spawned task under its
//! [`EffectId`]. The registry enforces the one correctness-sensitive
//! contract of the architecture:
//!
//! - **Supersession**: scheduling a new cancellable effect under an id that
//!   is already in flight aborts the older task first (last-write-wins, no
//!   stacked timers).
//! - **Teardown**: [`Store::shutdown`] aborts every registered task before
//!   waiting for pending effects, so nothing fires into a torn-down session.
//!
//! `Effect::Cancel(id)` aborts a registered task explicitly.
//!
//! ## Example
//!
//! ```ignore
//! let store = Store::new(SessionState::default(), SessionReducer::new(), env);
//!
//! let handle = store.send(SessionAction::Scan { item_id }).await?;
//! handle.wait().await; // decay timer has fired (or been superseded)
//!
//! store.shutdown(Duration::from_secs(1)).await?;
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use scanpack_core::effect::{Effect, EffectId};
use scanpack_core::reducer::Reducer;
use tokio::sync::{RwLock, watch};
use tokio::task::AbortHandle;

/// Store error types
pub mod error {
    use thiserror::Error;

    /// Errors surfaced by the [`Store`](super::Store) runtime
    ///
    /// Reducers are infallible; these errors only concern the store
    /// lifecycle.
    #[derive(Debug, Error)]
    pub enum StoreError {
        /// The store is shutting down and no longer accepts actions
        #[error("store is shutting down, action rejected")]
        ShutdownInProgress,

        /// Shutdown timed out with effects still running
        #[error("shutdown timed out with {0} effects still pending")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send`] so callers (mostly tests) can wait until the
/// effects spawned by an action have finished, been superseded, or been
/// aborted.
#[derive(Clone)]
pub struct EffectHandle {
    pending: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            pending: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: tx,
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    ///
    /// Useful for initialization in loops where you need a `last_handle`.
    #[must_use]
    pub fn completed() -> Self {
        let (tx, rx) = watch::channel(());
        let _ = tx.send(());

        Self {
            pending: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Wait for all effects spawned by the originating action to finish
    ///
    /// Aborted effects (superseded timers, teardown) count as finished.
    pub async fn wait(&mut self) {
        while self.pending.load(Ordering::SeqCst) > 0 {
            let _ = self.completion.changed().await;
        }
    }

    /// Wait for effect completion with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    /// Tracking nobody waits on, for effects nested inside running tasks
    fn detached() -> Self {
        let (tx, _) = watch::channel(());
        Self {
            counter: Arc::new(AtomicUsize::new(0)),
            notifier: tx,
        }
    }

    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            counter: Arc::clone(&self.counter),
            notifier: self.notifier.clone(),
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Ensures the counter is decremented even when the task is aborted.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A registered cancellable task
///
/// `seq` disambiguates registrations under the same id: a finished task only
/// deregisters itself if its own registration is still the current one.
#[derive(Debug)]
struct TimerSlot {
    seq: u64,
    abort: AbortHandle,
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind `RwLock`, read via [`Store::state`])
/// 2. Reducer (decision logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution, including the cancellable-timer registry
///
/// One store instance owns one session for the lifetime of one mount; create
/// a fresh store per session rather than sharing a process-wide one.
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    state: Arc<RwLock<S>>,
    reducer: R,
    environment: E,
    shutdown: Arc<AtomicBool>,
    pending_effects: Arc<AtomicUsize>,
    timers: Arc<Mutex<HashMap<EffectId, TimerSlot>>>,
    timer_seq: Arc<AtomicU64>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone,
    E: Clone,
{
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            reducer: self.reducer.clone(),
            environment: self.environment.clone(),
            shutdown: Arc::clone(&self.shutdown),
            pending_effects: Arc::clone(&self.pending_effects),
            timers: Arc::clone(&self.timers),
            timer_seq: Arc::clone(&self.timer_seq),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
    S: Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial_state)),
            reducer,
            environment,
            shutdown: Arc::new(AtomicBool::new(false)),
            pending_effects: Arc::new(AtomicUsize::new(0)),
            timers: Arc::new(Mutex::new(HashMap::new())),
            timer_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Runs the reducer with (state, action, environment)
    /// 3. Executes the returned effects on spawned tasks
    /// 4. Effects may produce more actions (feedback loop)
    ///
    /// `send` returns once effect execution has *started*; use the returned
    /// [`EffectHandle`] to wait for completion.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting
    /// down. Delayed actions arriving after teardown are rejected here,
    /// which is the second line of defense after timer abortion.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.shutdown.load(Ordering::Acquire) {
            tracing::debug!("rejected action: store is shutting down");
            metrics::counter!("store.actions.rejected").increment(1);
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.state.write().await;

            let start = std::time::Instant::now();
            let effects = self.reducer.reduce(&mut state, action, &self.environment);
            metrics::histogram!("store.reducer.duration_seconds")
                .record(start.elapsed().as_secs_f64());

            tracing::trace!(effects = effects.len(), "reducer completed");
            effects
        };

        for effect in effects {
            self.execute_effect(effect, tracking.clone());
        }

        Ok(handle)
    }

    /// Read current state via a closure
    ///
    /// Access state through a closure to ensure the lock is released
    /// promptly:
    ///
    /// ```ignore
    /// let scanned = store.state(|s| s.total_scanned()).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.state.read().await;
        f(&state)
    }

    /// Ids of cancellable effects currently registered, in sorted order
    ///
    /// A superseded or cancelled timer disappears from this list
    /// immediately; a fired timer disappears once its task deregisters.
    #[must_use]
    pub fn active_timers(&self) -> Vec<EffectId> {
        let mut ids: Vec<EffectId> = self.lock_timers().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Initiate teardown of the store
    ///
    /// 1. Sets the shutdown flag (new actions are rejected)
    /// 2. Aborts every registered cancellable effect
    /// 3. Waits for remaining pending effects, up to `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still pending
    /// when the timeout expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("initiating store teardown");
        metrics::counter!("store.shutdown.initiated").increment(1);

        self.shutdown.store(true, Ordering::Release);
        self.abort_all_timers();

        let start = std::time::Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            let pending = self.pending_effects.load(Ordering::Acquire);

            if pending == 0 {
                tracing::info!("all effects settled, teardown complete");
                metrics::counter!("store.shutdown.completed").increment(1);
                return Ok(());
            }

            if start.elapsed() >= timeout {
                tracing::error!(pending, "teardown timed out with effects still pending");
                metrics::counter!("store.shutdown.timeout").increment(1);
                return Err(StoreError::ShutdownTimeout(pending));
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Execute one effect, spawning tasks as needed
    fn execute_effect(&self, effect: Effect<A>, tracking: EffectTracking) {
        match effect {
            Effect::None => {
                metrics::counter!("store.effects.executed", "type" => "none").increment(1);
            },
            Effect::Parallel(effects) => {
                metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                for effect in effects {
                    self.execute_effect(effect, tracking.clone());
                }
            },
            Effect::Sequential(effects) => {
                metrics::counter!("store.effects.executed", "type" => "sequential").increment(1);
                let _ = self.spawn_tracked(tracking, move |store| async move {
                    for effect in effects {
                        store.run_serial(effect).await;
                    }
                });
            },
            effect @ (Effect::Delay { .. } | Effect::Future(_)) => {
                let kind = match effect {
                    Effect::Delay { .. } => "delay",
                    _ => "future",
                };
                metrics::counter!("store.effects.executed", "type" => kind).increment(1);
                let _ = self.spawn_tracked(tracking, move |store| async move {
                    store.run_serial(effect).await;
                });
            },
            Effect::Cancellable { id, effect } => {
                metrics::counter!("store.effects.executed", "type" => "cancellable").increment(1);
                self.schedule_cancellable(id, *effect, tracking);
            },
            Effect::Cancel(id) => {
                metrics::counter!("store.effects.executed", "type" => "cancel").increment(1);
                self.cancel_timer(id);
            },
        }
    }

    /// Spawn a tracked task running an effect body
    ///
    /// Both guards are constructed before the spawn and moved into the
    /// future, so a task aborted before its first poll still settles its
    /// counters when the unpolled future is dropped.
    fn spawn_tracked<F, Fut>(&self, tracking: EffectTracking, body: F) -> AbortHandle
    where
        F: FnOnce(Self) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        tracking.increment();
        self.pending_effects.fetch_add(1, Ordering::SeqCst);
        let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));
        let guard = DecrementGuard(tracking);

        let store = self.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            let _pending_guard = pending_guard;
            body(store).await;
        });
        task.abort_handle()
    }

    /// Run an effect to completion within an already-spawned task
    async fn run_serial(&self, effect: Effect<A>) {
        match effect {
            Effect::None => {},
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                tracing::trace!("delay elapsed, dispatching action");
                let _ = self.send(*action).await;
            },
            Effect::Future(future) => {
                if let Some(action) = future.await {
                    let _ = self.send(action).await;
                }
            },
            Effect::Sequential(effects) => {
                for effect in effects {
                    Box::pin(self.run_serial(effect)).await;
                }
            },
            // Nested concurrent or registered effects go back through the
            // executor; nobody waits on them beyond the store itself.
            effect @ (Effect::Parallel(_) | Effect::Cancellable { .. } | Effect::Cancel(_)) => {
                self.execute_effect(effect, EffectTracking::detached());
            },
        }
    }

    /// Register a cancellable effect, superseding any predecessor
    fn schedule_cancellable(&self, id: EffectId, effect: Effect<A>, tracking: EffectTracking) {
        let seq = self.timer_seq.fetch_add(1, Ordering::SeqCst);

        // The task waits for its registration before running, so it cannot
        // deregister a slot that is not yet in the map.
        let (ready_tx, ready_rx) = tokio::sync::oneshot::channel::<()>();

        let abort = self.spawn_tracked(tracking, move |store| async move {
            if ready_rx.await.is_err() {
                return;
            }
            store.run_serial(effect).await;
            store.release_timer(id, seq);
        });

        let superseded = self
            .lock_timers()
            .insert(id, TimerSlot { seq, abort })
            .map(|old| old.abort);

        if let Some(old) = superseded {
            old.abort();
            tracing::trace!(timer = %id, "superseded in-flight cancellable effect");
            metrics::counter!("store.timers.superseded").increment(1);
        }

        let _ = ready_tx.send(());
    }

    /// Abort and deregister the effect registered under `id`, if any
    fn cancel_timer(&self, id: EffectId) {
        if let Some(slot) = self.lock_timers().remove(&id) {
            slot.abort.abort();
            tracing::trace!(timer = %id, "cancelled effect");
            metrics::counter!("store.timers.cancelled").increment(1);
        }
    }

    /// Deregister a finished task, unless it has already been superseded
    fn release_timer(&self, id: EffectId, seq: u64) {
        let mut timers = self.lock_timers();
        if timers.get(&id).is_some_and(|slot| slot.seq == seq) {
            timers.remove(&id);
        }
    }

    /// Abort every registered cancellable effect (teardown)
    fn abort_all_timers(&self) {
        let drained: Vec<(EffectId, TimerSlot)> = self.lock_timers().drain().collect();
        for (id, slot) in drained {
            slot.abort.abort();
            tracing::debug!(timer = %id, "aborted timer on teardown");
            metrics::counter!("store.timers.cancelled").increment(1);
        }
    }

    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    fn lock_timers(&self) -> MutexGuard<'_, HashMap<EffectId, TimerSlot>> {
        self.timers.lock().unwrap()
    }
}
