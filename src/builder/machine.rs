//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::engine::StateMachine;
use crate::sched::{interval_for_refresh_rate, Clock, MonotonicClock, Scheduler};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Builder for a [`StateMachine`] with a fluent API.
///
/// A concrete machine supplies its starting state and full valid-state
/// set here; both are immutable for the machine's lifetime. The
/// scheduler is the host collaborator that marshals listener callbacks
/// onto the UI thread and drives animation ticks.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use veer::sched::manual::ManualScheduler;
/// use veer::StateMachine;
///
/// veer::surface_states! {
///     enum Home {
///         Default,
///         Drawer,
///         Swiping,
///     }
/// }
///
/// let machine = StateMachine::builder()
///     .tag("home")
///     .initial(Home::Default)
///     .states(Home::ALL.iter().copied())
///     .scheduler(Arc::new(ManualScheduler::new()))
///     .build()
///     .unwrap();
///
/// assert!(machine.in_state(Home::Default));
/// ```
pub struct StateMachineBuilder<S: State> {
    tag: Option<String>,
    initial: Option<S>,
    states: HashSet<S>,
    scheduler: Option<Arc<dyn Scheduler>>,
    clock: Option<Arc<dyn Clock>>,
    tick_interval: Duration,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            tag: None,
            initial: None,
            states: HashSet::new(),
            scheduler: None,
            clock: None,
            tick_interval: interval_for_refresh_rate(60.0),
        }
    }

    /// Set the tag used in log lines for this machine.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the starting state (required). It must also be listed in the
    /// valid-state set.
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add states to the valid-state set.
    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states);
        self
    }

    /// Add a single state to the valid-state set.
    pub fn state(mut self, state: S) -> Self {
        self.states.insert(state);
        self
    }

    /// Set the scheduler collaborator (required).
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Set the clock collaborator. Defaults to a monotonic system
    /// clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the animation tick interval. Defaults to 60 Hz; hosts that
    /// know their display rate pass
    /// [`interval_for_refresh_rate`](crate::sched::interval_for_refresh_rate).
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing or inconsistent.
    pub fn build(self) -> Result<StateMachine<S>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }
        if !self.states.contains(&initial) {
            return Err(BuildError::InitialStateNotValid(initial.name().to_string()));
        }
        let scheduler = self.scheduler.ok_or(BuildError::MissingScheduler)?;
        if self.tick_interval.is_zero() {
            return Err(BuildError::ZeroTickInterval);
        }
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let tag = self.tag.unwrap_or_else(|| "surface".to_string());

        Ok(StateMachine::from_parts(
            tag,
            initial,
            self.states,
            scheduler,
            clock,
            self.tick_interval,
        ))
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
