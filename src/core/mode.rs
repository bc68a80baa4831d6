//! Transition modes.

use serde::Serialize;

/// The style of transition an engine is running at a given instant.
///
/// The three modes are mutually exclusive. A fling-to-completion is not a
/// mode of its own: it is a sequence of synthetic increments produced by
/// the extrapolation loop while the engine stays in
/// [`TransitionMode::Incremental`].
///
/// Mode changes always route through [`TransitionMode::None`]; there is
/// no direct edge between `Timed` and `Incremental`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum TransitionMode {
    /// No transition is in flight.
    None,
    /// Progress advances on the clock toward completion, with easing.
    Timed,
    /// Progress is driven by discrete external increments (e.g. a drag).
    Incremental,
}

impl TransitionMode {
    /// Name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Timed => "Timed",
            Self::Incremental => "Incremental",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_are_stable() {
        assert_eq!(TransitionMode::None.name(), "None");
        assert_eq!(TransitionMode::Timed.name(), "Timed");
        assert_eq!(TransitionMode::Incremental.name(), "Incremental");
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        assert_ne!(TransitionMode::None, TransitionMode::Timed);
        assert_ne!(TransitionMode::Timed, TransitionMode::Incremental);
        assert_ne!(TransitionMode::Incremental, TransitionMode::None);
    }
}
