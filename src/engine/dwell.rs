//! Dwell-gated state tracking.
//!
//! Keeps track of the state of a dragged element as it moves over a
//! surface, publishing changes as it goes. Unlike the transition
//! engine, which is told what to do, a [`DwellMachine`] polls its
//! delegate every tick for which candidate states are currently allowed
//! and settles on the highest-ranked one. Disruptive states (scroll the
//! page, displace an item) carry a dwell threshold: the candidate must
//! stay allowed for that long before it commits.

use crate::core::State;
use crate::sched::{Clock, Scheduler, TaskHandle};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::trace;

/// The drop target a [`DwellMachine`] is attached to.
///
/// `can_enter` is a synchronous query and runs on the tick context;
/// the two notification hooks are marshalled onto the UI thread.
pub trait DwellDelegate<S: State>: Send + Sync {
    /// Whether the surface could sit in `state` right now.
    fn can_enter(&self, state: S) -> bool;

    /// The committed state changed.
    fn on_state_changed(&self, state: S);

    /// Called each tick spent parked in a non-default state, with the
    /// time spent there so far. Useful for doing something faster the
    /// longer the state holds.
    fn on_still_in_state(&self, _state: S, _held_for: Duration) {}
}

/// One candidate state, optionally gated by a dwell threshold.
#[derive(Clone, Copy, Debug)]
pub struct DwellCandidate<S: State> {
    state: S,
    dwell: Option<Duration>,
}

impl<S: State> DwellCandidate<S> {
    /// A candidate that commits as soon as it is allowed.
    pub fn new(state: S) -> Self {
        Self { state, dwell: None }
    }

    /// A candidate that must stay allowed for `dwell` before it
    /// commits.
    pub fn with_dwell(state: S, dwell: Duration) -> Self {
        Self {
            state,
            dwell: Some(dwell),
        }
    }

    /// The candidate state.
    pub fn state(&self) -> S {
        self.state
    }

    /// The dwell threshold, if any.
    pub fn dwell(&self) -> Option<Duration> {
        self.dwell
    }
}

struct DwellCore<S: State> {
    state: S,
    /// When a thresholded candidate was first requested, and which.
    pending: Option<(u64, S)>,
    entered_at_ms: u64,
    task: Option<TaskHandle>,
}

struct DwellInner<S: State> {
    default_state: S,
    /// Checked back-to-front: later candidates outrank earlier ones.
    candidates: Vec<DwellCandidate<S>>,
    delegate: Arc<dyn DwellDelegate<S>>,
    scheduler: Arc<dyn Scheduler>,
    clock: Arc<dyn Clock>,
    tick_interval: Duration,
    core: Mutex<DwellCore<S>>,
}

/// Tick-driven controller that settles on the highest-ranked allowed
/// candidate, honoring per-candidate dwell thresholds.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use veer::engine::{DwellCandidate, DwellDelegate, DwellMachine};
/// use veer::sched::manual::{ManualClock, ManualScheduler};
///
/// veer::surface_states! {
///     enum Drop {
///         Waiting,
///         Hovering,
///         Displacing,
///     }
/// }
///
/// struct AlwaysHover;
///
/// impl DwellDelegate<Drop> for AlwaysHover {
///     fn can_enter(&self, state: Drop) -> bool {
///         state == Drop::Hovering
///     }
///     fn on_state_changed(&self, _state: Drop) {}
/// }
///
/// let scheduler = Arc::new(ManualScheduler::new());
/// let machine = DwellMachine::new(
///     Drop::Waiting,
///     vec![
///         DwellCandidate::new(Drop::Hovering),
///         DwellCandidate::with_dwell(Drop::Displacing, Duration::from_millis(500)),
///     ],
///     Arc::new(AlwaysHover),
///     scheduler.clone(),
///     Arc::new(ManualClock::new()),
///     Duration::from_millis(8),
/// );
///
/// machine.start();
/// assert_eq!(machine.state(), Drop::Hovering);
/// ```
#[derive(Clone)]
pub struct DwellMachine<S: State> {
    inner: Arc<DwellInner<S>>,
}

impl<S: State> DwellMachine<S> {
    /// Create a machine resting in `default_state`.
    ///
    /// `candidates` are ranked lowest to highest; each tick the
    /// highest-ranked candidate the delegate allows wins, or the
    /// default when none is allowed.
    pub fn new(
        default_state: S,
        candidates: Vec<DwellCandidate<S>>,
        delegate: Arc<dyn DwellDelegate<S>>,
        scheduler: Arc<dyn Scheduler>,
        clock: Arc<dyn Clock>,
        tick_interval: Duration,
    ) -> Self {
        let entered_at_ms = clock.now_ms();
        Self {
            inner: Arc::new(DwellInner {
                default_state,
                candidates,
                delegate,
                scheduler,
                clock,
                tick_interval,
                core: Mutex::new(DwellCore {
                    state: default_state,
                    pending: None,
                    entered_at_ms,
                    task: None,
                }),
            }),
        }
    }

    /// The committed state.
    pub fn state(&self) -> S {
        self.lock_core().state
    }

    /// Tick once now, then keep ticking on the scheduler until
    /// [`stop`](Self::stop).
    pub fn start(&self) {
        self.tick();
        let weak = Arc::downgrade(&self.inner);
        let task = self.inner.scheduler.repeating(
            self.inner.tick_interval,
            Box::new(move || match weak.upgrade() {
                Some(inner) => {
                    DwellMachine { inner }.tick();
                    true
                }
                None => false,
            }),
        );
        let mut core = self.lock_core();
        if let Some(previous) = core.task.replace(task) {
            previous.cancel();
        }
    }

    /// Stop ticking. The committed state stays where it is.
    pub fn stop(&self) {
        let task = self.lock_core().task.take();
        if let Some(task) = task {
            task.cancel();
        }
    }

    fn lock_core(&self) -> MutexGuard<'_, DwellCore<S>> {
        self.inner.core.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn tick(&self) {
        let now = self.inner.clock.now_ms();
        // Delegate queries happen before taking the lock so a delegate
        // may read the machine without deadlocking.
        let target = self
            .inner
            .candidates
            .iter()
            .rev()
            .find(|candidate| self.inner.delegate.can_enter(candidate.state()))
            .copied()
            .unwrap_or(DwellCandidate::new(self.inner.default_state));

        let mut core = self.lock_core();
        if core.state == target.state() {
            if core.state != self.inner.default_state {
                let held = Duration::from_millis(now.saturating_sub(core.entered_at_ms));
                let delegate = self.inner.delegate.clone();
                let state = core.state;
                self.inner
                    .scheduler
                    .post_to_ui(Box::new(move || delegate.on_still_in_state(state, held)));
            }
            return;
        }

        match target.dwell() {
            None => self.commit(&mut core, target.state(), now),
            Some(dwell) => match core.pending {
                Some((queued_at_ms, queued)) if queued == target.state() => {
                    if queued_at_ms + dwell.as_millis() as u64 <= now {
                        self.commit(&mut core, target.state(), now);
                    }
                }
                _ => core.pending = Some((now, target.state())),
            },
        }
    }

    fn commit(&self, core: &mut DwellCore<S>, state: S, now: u64) {
        trace!(from = core.state.name(), to = state.name(), "dwell switch");
        core.state = state;
        core.pending = None;
        core.entered_at_ms = now;
        let delegate = self.inner.delegate.clone();
        self.inner
            .scheduler
            .post_to_ui(Box::new(move || delegate.on_state_changed(state)));
    }
}
