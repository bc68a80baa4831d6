//! Transition requests.
//!
//! A request describes what the caller wants the engine to do once its
//! paired predicate matches. Requests are inert values; submitting the
//! plan that carries them is what executes one.

use super::state::State;
use std::time::Duration;

/// A desired transition, plus its discipline-specific parameters.
///
/// `Immediate`, `Timed`, and `Incremental` begin a transition and are
/// normally paired with an [`at`](super::Predicate::at) predicate; the
/// remaining kinds steer a transition already in flight and pair with
/// the `during_*` predicates.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use veer::core::Request;
///
/// veer::surface_states! {
///     enum Home {
///         Default,
///         Drawer,
///     }
/// }
///
/// let open = Request::timed(Home::Drawer, Duration::from_millis(300));
/// assert_eq!(
///     open,
///     Request::Timed { to: Home::Drawer, duration: Duration::from_millis(300) },
/// );
///
/// // A drag of 80 px across a 200 px span is a 40% increment.
/// assert_eq!(
///     Request::<Home>::increment_scaled(80.0, 200.0),
///     Request::Increment(0.4),
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Request<S: State> {
    /// Switch to the state with no animation.
    Immediate(S),
    /// Animate to the state over a fixed duration.
    Timed {
        /// Target state.
        to: S,
        /// How long the eased animation takes.
        duration: Duration,
    },
    /// Begin an externally-driven transition toward the state.
    Incremental(S),
    /// Report drag progress for the in-flight incremental transition.
    Increment(f32),
    /// Finish the in-flight transition where it is headed.
    Commit,
    /// Roll the in-flight transition back to where it started.
    Abort,
    /// Extrapolate the drag velocity forward until the transition
    /// completes.
    FittedCommit,
    /// Extrapolate the drag velocity backward until the transition
    /// collapses.
    FittedAbort,
}

impl<S: State> Request<S> {
    /// Switch to `state` with no animation.
    pub fn immediate(state: S) -> Self {
        Self::Immediate(state)
    }

    /// Animate to `state` over `duration`.
    pub fn timed(state: S, duration: Duration) -> Self {
        Self::Timed {
            to: state,
            duration,
        }
    }

    /// Begin an incremental transition toward `state`.
    pub fn incremental(state: S) -> Self {
        Self::Incremental(state)
    }

    /// Report raw drag progress as a completion fraction.
    pub fn increment(percent: f32) -> Self {
        Self::Increment(percent)
    }

    /// Report drag progress as a distance over the full span it covers.
    pub fn increment_scaled(amount: f32, max: f32) -> Self {
        Self::Increment(amount / max)
    }

    /// Finish the in-flight transition.
    pub fn commit() -> Self {
        Self::Commit
    }

    /// Roll the in-flight transition back.
    pub fn abort() -> Self {
        Self::Abort
    }

    /// Fling forward to completion at the observed drag velocity.
    pub fn fitted_commit() -> Self {
        Self::FittedCommit
    }

    /// Fling backward to the origin at the observed drag velocity.
    pub fn fitted_abort() -> Self {
        Self::FittedAbort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface_states;

    surface_states! {
        enum TestState {
            Default,
            Drawer,
        }
    }

    #[test]
    fn factories_build_the_matching_variant() {
        assert_eq!(
            Request::immediate(TestState::Drawer),
            Request::Immediate(TestState::Drawer)
        );
        assert_eq!(
            Request::incremental(TestState::Drawer),
            Request::Incremental(TestState::Drawer)
        );
        assert_eq!(Request::<TestState>::commit(), Request::Commit);
        assert_eq!(Request::<TestState>::abort(), Request::Abort);
        assert_eq!(Request::<TestState>::fitted_commit(), Request::FittedCommit);
        assert_eq!(Request::<TestState>::fitted_abort(), Request::FittedAbort);
    }

    #[test]
    fn timed_carries_its_duration() {
        let request = Request::timed(TestState::Drawer, Duration::from_millis(250));
        match request {
            Request::Timed { to, duration } => {
                assert_eq!(to, TestState::Drawer);
                assert_eq!(duration, Duration::from_millis(250));
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn scaled_increment_normalizes_against_the_span() {
        assert_eq!(
            Request::<TestState>::increment_scaled(50.0, 200.0),
            Request::Increment(0.25)
        );
    }
}
