//! Veer: transition orchestration for animated UI surfaces.
//!
//! A [`StateMachine`] holds the state of one visual surface (a home
//! screen, a drawer, an overlay) and governs how it moves between a
//! fixed set of states. Four transition styles are supported: instant
//! switches, timed eased animations, gesture-driven incremental
//! progress, and fling-to-completion, where the recent drag velocity is
//! extrapolated until the transition finishes on its own.
//!
//! Callers never mutate the machine directly. They submit a
//! [`StateChange`] plan, an ordered list of (predicate, request) pairs;
//! the first pair whose predicate matches the machine's current state
//! and transition mode executes, and everything else is skipped
//! silently. That makes speculative submission the normal calling
//! style: a gesture recognizer can describe what should happen from
//! several starting conditions and let the machine pick.
//!
//! The engine owns no threads. A host-supplied [`Scheduler`] provides
//! the two primitives it needs: a repeating tick for animations and
//! flings, and FIFO marshalling of listener callbacks onto the UI
//! thread.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use veer::sched::manual::ManualScheduler;
//! use veer::{StateChange, StateMachine};
//!
//! veer::surface_states! {
//!     enum Home {
//!         Default,
//!         Drawer,
//!         Swiping,
//!     }
//! }
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let machine = StateMachine::builder()
//!     .tag("home")
//!     .initial(Home::Default)
//!     .states(Home::ALL.iter().copied())
//!     .scheduler(scheduler.clone())
//!     .build()
//!     .unwrap();
//!
//! machine.submit(StateChange::immediate(Home::Default, Home::Drawer));
//! assert!(machine.in_state(Home::Drawer));
//!
//! // Listener callbacks run when the host drains its UI queue.
//! scheduler.drain_ui();
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod sched;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use core::{
    Predicate, Request, State, StateChange, StateChangeBuilder, TransitionLog, TransitionMode,
    TransitionRecord,
};
pub use engine::{
    DwellCandidate, DwellDelegate, DwellMachine, ListenerToken, Snapshot, StateListener,
    StateMachine,
};
pub use sched::{Clock, MonotonicClock, Scheduler, TaskHandle, TokioScheduler};
