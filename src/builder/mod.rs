//! Builder API for constructing state machines.
//!
//! A machine is always built explicitly and owned by whatever composes
//! the UI surface it governs; there is no global registry. The builder
//! validates the starting state, valid-state set, and collaborators
//! before the engine exists.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
