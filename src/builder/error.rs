//! Build errors for state machine construction.

use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("No valid states defined. Call .states(..) with at least one state")]
    NoStates,

    #[error("Scheduler not specified. Call .scheduler(..) before .build()")]
    MissingScheduler,

    #[error("Initial state {0} is not in the valid-state set")]
    InitialStateNotValid(String),

    #[error("Tick interval must be non-zero")]
    ZeroTickInterval,
}
