//! Core value types of the transition engine.
//!
//! This module holds the pure pieces: states and modes, the predicate /
//! request / plan trio that callers compose, and the transition journal.
//! Nothing here has side effects; only submitting a plan to a
//! [`StateMachine`](crate::engine::StateMachine) mutates anything.

mod history;
mod mode;
mod plan;
mod predicate;
mod request;
mod state;

pub use history::{TransitionLog, TransitionRecord};
pub use mode::TransitionMode;
pub use plan::{StateChange, StateChangeBuilder};
pub use predicate::Predicate;
pub use request::Request;
pub use state::State;
