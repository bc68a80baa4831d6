//! Predicates gating transition requests.
//!
//! A predicate names the (state, mode) pair an engine must currently be
//! in for the paired request to be honored. Predicates are pure values
//! constructed through named factories; evaluating one never has side
//! effects.

use super::mode::TransitionMode;
use super::state::State;

/// Guard that a [`Request`](super::Request) must match to execute.
///
/// # Example
///
/// ```rust
/// use veer::core::{Predicate, TransitionMode};
///
/// veer::surface_states! {
///     enum Home {
///         Default,
///         Drawer,
///     }
/// }
///
/// let settled = Predicate::at(Home::Default);
/// assert_eq!(settled.state(), Home::Default);
/// assert_eq!(settled.mode(), TransitionMode::None);
///
/// let dragging = Predicate::during_incremental(Home::Drawer);
/// assert_eq!(dragging.mode(), TransitionMode::Incremental);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Predicate<S: State> {
    state: S,
    mode: TransitionMode,
}

impl<S: State> Predicate<S> {
    fn new(state: S, mode: TransitionMode) -> Self {
        Self { state, mode }
    }

    /// Matches when the engine sits in `state` with no transition in
    /// flight.
    pub fn at(state: S) -> Self {
        Self::new(state, TransitionMode::None)
    }

    /// Matches mid-animation: the engine is moving toward `state` on a
    /// timed transition.
    pub fn during_timed(state: S) -> Self {
        Self::new(state, TransitionMode::Timed)
    }

    /// Matches mid-drag: the engine is moving toward `state` on an
    /// incremental transition.
    pub fn during_incremental(state: S) -> Self {
        Self::new(state, TransitionMode::Incremental)
    }

    /// All three predicates for `state`, for plans that should fire
    /// regardless of how the engine got there.
    ///
    /// Checked in the returned order: incremental, timed, then settled.
    pub fn any(state: S) -> Vec<Self> {
        vec![
            Self::during_incremental(state),
            Self::during_timed(state),
            Self::at(state),
        ]
    }

    /// The state this predicate requires the engine to be in.
    pub fn state(&self) -> S {
        self.state
    }

    /// The transition mode this predicate requires.
    pub fn mode(&self) -> TransitionMode {
        self.mode
    }
}
