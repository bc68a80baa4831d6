//! The transition engine.
//!
//! A [`StateMachine`] holds the state of one UI surface and orchestrates
//! when view state is applied: callers submit [`StateChange`] plans, the
//! first entry whose predicate matches the machine's current condition
//! executes, and registered listeners hear about it on the UI thread.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::builder::StateMachineBuilder;
use crate::core::{
    Predicate, Request, State, StateChange, TransitionLog, TransitionMode, TransitionRecord,
};
use crate::engine::easing::ease_in_out;
use crate::engine::listener::{ListenerSet, ListenerToken, StateListener};
use crate::engine::velocity::{FlingDirection, SampleWindow};
use crate::sched::{Clock, Scheduler, TaskHandle};

/// Point-in-time view of an engine, serializable for debug dumps.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(bound = "")]
pub struct Snapshot<S: State> {
    /// The state before the most recent transition; unset until the
    /// first transition runs.
    pub last: Option<S>,
    /// The state the machine is in, or is transitioning toward.
    pub current: S,
    /// The transition mode in flight.
    pub mode: TransitionMode,
    /// Progress of the in-flight transition, 0 when settled.
    pub percent: f32,
}

/// Everything the engine mutates, guarded by one mutex.
struct EngineCore<S: State> {
    last: Option<S>,
    current: S,
    percent: f32,
    mode: TransitionMode,
    samples: SampleWindow,
    log: TransitionLog<S>,
    /// Bumped whenever the live scheduled task changes; stale ticks
    /// compare against it and stand down.
    generation: u64,
    /// At most one timed-animation or fling loop is live per engine.
    active_task: Option<TaskHandle>,
}

struct Inner<S: State> {
    tag: String,
    valid: HashSet<S>,
    tick_interval: Duration,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
    listeners: ListenerSet<S>,
    core: Mutex<EngineCore<S>>,
}

/// State machine for a UI surface.
///
/// Submitting a plan scans its entries in order under the engine's lock
/// and executes the first matching request; everything else is skipped
/// silently, so callers submit speculative plans without pre-checking
/// state. Handles are cheap to clone and share one engine.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use veer::sched::manual::ManualScheduler;
/// use veer::{StateChange, StateMachine, TransitionMode};
///
/// veer::surface_states! {
///     enum Home {
///         Default,
///         Drawer,
///         Swiping,
///     }
/// }
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let machine = StateMachine::builder()
///     .tag("home")
///     .initial(Home::Default)
///     .states(Home::ALL.iter().copied())
///     .scheduler(scheduler)
///     .build()
///     .unwrap();
///
/// // Begin dragging the drawer open.
/// let went = machine.submit(StateChange::incremental(Home::Default, Home::Drawer));
/// assert_eq!(went, Some(Home::Drawer));
/// assert_eq!(machine.mode(), TransitionMode::Incremental);
///
/// // An instant switch is rejected mid-drag: its predicate expects a
/// // settled surface.
/// let rejected = machine.submit(StateChange::immediate(Home::Drawer, Home::Default));
/// assert_eq!(rejected, None);
/// ```
#[derive(Clone)]
pub struct StateMachine<S: State> {
    inner: Arc<Inner<S>>,
}

impl<S: State> StateMachine<S> {
    /// Start building a machine.
    pub fn builder() -> StateMachineBuilder<S> {
        StateMachineBuilder::new()
    }

    pub(crate) fn from_parts(
        tag: String,
        initial: S,
        valid: HashSet<S>,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                tag,
                valid,
                tick_interval,
                scheduler,
                clock,
                listeners: ListenerSet::new(),
                core: Mutex::new(EngineCore {
                    last: None,
                    current: initial,
                    percent: 0.0,
                    mode: TransitionMode::None,
                    samples: SampleWindow::default(),
                    log: TransitionLog::new(),
                    generation: 0,
                    active_task: None,
                }),
            }),
        }
    }

    /// Submit a transition plan.
    ///
    /// Returns the state the machine is in (or headed toward) after the
    /// first matching entry executed, or `None` when no entry matched
    /// and nothing changed.
    pub fn submit(&self, change: StateChange<S>) -> Option<S> {
        let mut core = self.lock_core();
        let request = change
            .entries()
            .iter()
            .find(|(predicate, _)| self.matches(&core, predicate))
            .map(|(_, request)| request.clone())?;
        self.execute(&mut core, request)
    }

    /// The state the machine is in, or is transitioning toward.
    pub fn current_state(&self) -> S {
        self.lock_core().current
    }

    /// The state before the most recent transition.
    pub fn last_state(&self) -> Option<S> {
        self.lock_core().last
    }

    /// Whether the machine is in (or headed toward) `state`.
    pub fn in_state(&self, state: S) -> bool {
        self.lock_core().current == state
    }

    /// The transition mode in flight.
    pub fn mode(&self) -> TransitionMode {
        self.lock_core().mode
    }

    /// Progress of the in-flight transition; 0 when settled.
    pub fn percent(&self) -> f32 {
        self.lock_core().percent
    }

    /// Atomic view of the engine for diagnostics.
    pub fn snapshot(&self) -> Snapshot<S> {
        let core = self.lock_core();
        Snapshot {
            last: core.last,
            current: core.current,
            mode: core.mode,
            percent: core.percent,
        }
    }

    /// Completed transitions, oldest first.
    pub fn recent_transitions(&self) -> Vec<TransitionRecord<S>> {
        self.lock_core().log.records().copied().collect()
    }

    /// The tag this machine logs under.
    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    /// Register a listener. Safe at any time, including from within a
    /// listener callback.
    pub fn register_listener(&self, listener: Arc<dyn StateListener<S>>) -> ListenerToken {
        self.inner.listeners.register(listener)
    }

    /// Remove a listener registration.
    ///
    /// # Panics
    ///
    /// Panics when the token isn't registered; that is a lifecycle bug
    /// in the caller.
    pub fn unregister_listener(&self, token: ListenerToken) {
        self.inner.listeners.unregister(token)
    }

    fn lock_core(&self) -> MutexGuard<'_, EngineCore<S>> {
        self.inner.core.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn matches(&self, core: &EngineCore<S>, predicate: &Predicate<S>) -> bool {
        predicate.state() == core.current
            && predicate.mode() == core.mode
            && self.inner.valid.contains(&predicate.state())
    }

    fn execute(&self, core: &mut EngineCore<S>, request: Request<S>) -> Option<S> {
        match request {
            Request::Immediate(to) => Some(self.immediate_change(core, to)),
            Request::Timed { to, duration } => Some(self.start_timed(core, to, duration)),
            Request::Incremental(to) => Some(self.start_incremental(core, to)),
            Request::Increment(raw) => self.increment(core, raw),
            Request::Commit => self.commit(core),
            Request::Abort => self.abort(core),
            Request::FittedCommit => self.start_fitted(core, FlingDirection::Commit),
            Request::FittedAbort => self.start_fitted(core, FlingDirection::Abort),
        }
    }

    /// Switch to `to` with no animation.
    fn immediate_change(&self, core: &mut EngineCore<S>, to: S) -> S {
        self.cancel_active_task(core);
        let from = core.current;
        core.last = Some(from);
        core.current = to;
        core.percent = 0.0;
        core.mode = TransitionMode::None;
        core.log.record(TransitionRecord {
            from,
            to,
            mode: TransitionMode::None,
            at: Utc::now(),
        });
        debug!(tag = %self.inner.tag, from = from.name(), to = to.name(), "immediate change");
        self.notify_end(from, to);
        to
    }

    /// Animate to `to` over `duration` with easing.
    fn start_timed(&self, core: &mut EngineCore<S>, to: S, duration: Duration) -> S {
        self.cancel_active_task(core);
        let from = core.current;
        core.last = Some(from);
        core.current = to;
        core.percent = 0.0;
        core.mode = TransitionMode::Timed;
        debug!(
            tag = %self.inner.tag,
            from = from.name(),
            to = to.name(),
            ?duration,
            "timed change"
        );
        self.notify_start(from, to);

        let generation = core.generation;
        let started_ms = self.inner.clock.now_ms();
        let duration_ms = (duration.as_millis() as u64).max(1);
        let weak = Arc::downgrade(&self.inner);
        let task = self.inner.scheduler.repeating(
            self.inner.tick_interval,
            Box::new(move || match weak.upgrade() {
                Some(inner) => {
                    StateMachine { inner }.timed_tick(generation, started_ms, duration_ms)
                }
                None => false,
            }),
        );
        core.active_task = Some(task);
        to
    }

    fn timed_tick(&self, generation: u64, started_ms: u64, duration_ms: u64) -> bool {
        let mut core = self.lock_core();
        if core.generation != generation || core.mode != TransitionMode::Timed {
            return false;
        }
        let elapsed = self.inner.clock.now_ms().saturating_sub(started_ms);
        if elapsed >= duration_ms {
            self.cancel_active_task(&mut core);
            self.finish_transition(&mut core, TransitionMode::Timed);
            return false;
        }
        let eased = ease_in_out(elapsed as f32 / duration_ms as f32);
        core.percent = eased;
        let from = core.last.unwrap_or(core.current);
        self.notify_incremental(from, core.current, eased);
        true
    }

    /// Begin an externally-driven transition toward `to`.
    fn start_incremental(&self, core: &mut EngineCore<S>, to: S) -> S {
        self.cancel_active_task(core);
        let from = core.current;
        core.last = Some(from);
        core.current = to;
        core.percent = 0.0;
        core.mode = TransitionMode::Incremental;
        core.samples.restart(self.inner.clock.now_ms());
        debug!(tag = %self.inner.tag, from = from.name(), to = to.name(), "incremental change");
        self.notify_start(from, to);
        to
    }

    /// Apply one observed progress point to the in-flight incremental
    /// transition.
    fn increment(&self, core: &mut EngineCore<S>, raw: f32) -> Option<S> {
        if core.mode != TransitionMode::Incremental {
            return None;
        }
        // No upper clamp: callers decide the 0/1 boundary via
        // commit/abort.
        let percent = raw.max(0.0);
        core.percent = percent;
        core.samples.push(self.inner.clock.now_ms(), percent);
        let from = core.last.unwrap_or(core.current);
        self.notify_incremental(from, core.current, percent);
        Some(core.current)
    }

    /// Finish the in-flight transition where it is headed.
    fn commit(&self, core: &mut EngineCore<S>) -> Option<S> {
        if core.mode == TransitionMode::None {
            return None;
        }
        self.cancel_active_task(core);
        let mode = core.mode;
        debug!(tag = %self.inner.tag, to = core.current.name(), "commit");
        self.finish_transition(core, mode);
        Some(core.current)
    }

    /// Roll the in-flight transition back to the state it left.
    fn abort(&self, core: &mut EngineCore<S>) -> Option<S> {
        if core.mode == TransitionMode::None {
            return None;
        }
        self.cancel_active_task(core);
        let mode = core.mode;
        let returning_from = core.current;
        let returning_to = core.last.unwrap_or(core.current);
        core.current = returning_to;
        core.last = Some(returning_from);
        debug!(tag = %self.inner.tag, back_to = returning_to.name(), "abort");
        self.finish_transition(core, mode);
        Some(core.current)
    }

    /// Extrapolate the observed drag velocity until the transition
    /// crosses its terminal threshold.
    fn start_fitted(&self, core: &mut EngineCore<S>, direction: FlingDirection) -> Option<S> {
        if core.mode != TransitionMode::Incremental {
            return None;
        }
        self.cancel_active_task(core);
        let velocity = core.samples.fling_velocity(direction);
        let start_percent = core.percent;
        let started_ms = self.inner.clock.now_ms();
        let generation = core.generation;
        debug!(
            tag = %self.inner.tag,
            to = core.current.name(),
            ?direction,
            velocity,
            "fitted completion"
        );
        let weak = Arc::downgrade(&self.inner);
        let task = self.inner.scheduler.repeating(
            self.inner.tick_interval,
            Box::new(move || match weak.upgrade() {
                Some(inner) => StateMachine { inner }.fitted_tick(
                    generation,
                    started_ms,
                    start_percent,
                    velocity,
                    direction,
                ),
                None => false,
            }),
        );
        core.active_task = Some(task);
        Some(core.current)
    }

    fn fitted_tick(
        &self,
        generation: u64,
        started_ms: u64,
        start_percent: f32,
        velocity: f32,
        direction: FlingDirection,
    ) -> bool {
        let mut core = self.lock_core();
        if core.generation != generation || core.mode != TransitionMode::Incremental {
            return false;
        }
        let elapsed = self.inner.clock.now_ms().saturating_sub(started_ms);
        let percent = start_percent + elapsed as f32 * velocity;
        let crossed = match direction {
            FlingDirection::Commit => percent >= 1.0,
            FlingDirection::Abort => percent <= 0.0,
        };
        if crossed {
            match direction {
                FlingDirection::Commit => self.commit(&mut core),
                FlingDirection::Abort => self.abort(&mut core),
            };
            return false;
        }
        self.increment(&mut core, percent);
        true
    }

    /// Terminal path shared by natural completion, cancellation,
    /// commit, and (after the swap) abort: settle, record, notify once.
    fn finish_transition(&self, core: &mut EngineCore<S>, mode: TransitionMode) {
        let from = core.last.unwrap_or(core.current);
        let to = core.current;
        core.percent = 0.0;
        core.mode = TransitionMode::None;
        core.log.record(TransitionRecord {
            from,
            to,
            mode,
            at: Utc::now(),
        });
        debug!(tag = %self.inner.tag, from = from.name(), to = to.name(), "transition finished");
        self.notify_end(from, to);
    }

    /// Invalidate outstanding ticks and stop the live task, if any.
    fn cancel_active_task(&self, core: &mut EngineCore<S>) {
        core.generation = core.generation.wrapping_add(1);
        if let Some(task) = core.active_task.take() {
            task.cancel();
        }
    }

    fn notify_start(&self, from: S, to: S) {
        for listener in self.inner.listeners.snapshot() {
            self.inner
                .scheduler
                .post_to_ui(Box::new(move || listener.on_start(from, to)));
        }
    }

    fn notify_incremental(&self, from: S, to: S, percent: f32) {
        for listener in self.inner.listeners.snapshot() {
            self.inner
                .scheduler
                .post_to_ui(Box::new(move || listener.on_incremental(from, to, percent)));
        }
    }

    fn notify_end(&self, from: S, to: S) {
        for listener in self.inner.listeners.snapshot() {
            self.inner
                .scheduler
                .post_to_ui(Box::new(move || listener.on_end(from, to)));
        }
    }
}
