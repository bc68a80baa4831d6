//! Trace a drag that ends in a fling-to-commit, driven frame by frame
//! with the manual collaborators.
//!
//! Run with: cargo run --example drag_commit

use std::sync::Arc;
use std::time::Duration;
use veer::sched::manual::{ManualClock, ManualScheduler};
use veer::{Predicate, Request, StateChange, StateMachine, TransitionMode};

veer::surface_states! {
    pub enum Surface {
        Closed,
        Open,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let scheduler = Arc::new(ManualScheduler::new());
    let clock = ManualClock::new();
    let machine = StateMachine::builder()
        .tag("sheet")
        .initial(Surface::Closed)
        .states(Surface::ALL.iter().copied())
        .scheduler(scheduler.clone())
        .clock(Arc::new(clock.clone()))
        .tick_interval(Duration::from_millis(16))
        .build()?;

    machine.submit(StateChange::incremental(Surface::Closed, Surface::Open));
    for (after_ms, percent) in [(40, 0.15), (40, 0.35), (40, 0.6)] {
        clock.advance(Duration::from_millis(after_ms));
        machine.submit(StateChange::increment(Surface::Open, percent));
        println!("dragged to {:.2}", machine.percent());
    }

    // Finger lifted: extrapolate the observed velocity to completion.
    machine.submit(
        StateChange::builder()
            .maybe(
                Predicate::during_incremental(Surface::Open),
                Request::fitted_commit(),
            )
            .build(),
    );
    while machine.mode() == TransitionMode::Incremental {
        clock.advance(Duration::from_millis(16));
        scheduler.fire_tick();
        println!("flinging through {:.2}", machine.percent());
    }
    scheduler.drain_ui();

    println!("settled in {:?}", machine.current_state());
    Ok(())
}
