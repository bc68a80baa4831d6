//! The transition engine and its observation surface.

mod dwell;
mod easing;
mod listener;
mod machine;
mod velocity;

pub use dwell::{DwellCandidate, DwellDelegate, DwellMachine};
pub use listener::{ListenerToken, StateListener};
pub use machine::{Snapshot, StateMachine};
