//! Drive a home-surface machine through an animated drawer open.
//!
//! Run with: cargo run --example home_surface

use std::sync::Arc;
use std::time::Duration;
use veer::sched::TokioScheduler;
use veer::{StateChange, StateListener, StateMachine};

veer::surface_states! {
    pub enum Home {
        Default,
        Drawer,
        Swiping,
    }
}

struct PrintListener;

impl StateListener<Home> for PrintListener {
    fn on_start(&self, from: Home, to: Home) {
        println!("start  {from:?} -> {to:?}");
    }

    fn on_incremental(&self, from: Home, to: Home, percent: f32) {
        println!("  ...  {from:?} -> {to:?} at {percent:.2}");
    }

    fn on_end(&self, from: Home, to: Home) {
        println!("end    {from:?} -> {to:?}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let machine = StateMachine::builder()
        .tag("home")
        .initial(Home::Default)
        .states(Home::ALL.iter().copied())
        .scheduler(Arc::new(TokioScheduler::current()))
        .tick_interval(Duration::from_millis(32))
        .build()?;
    let _token = machine.register_listener(Arc::new(PrintListener));

    machine.submit(StateChange::timed(
        Home::Default,
        Home::Drawer,
        Duration::from_millis(300),
    ));
    tokio::time::sleep(Duration::from_millis(400)).await;

    println!("settled in {:?}", machine.current_state());
    Ok(())
}
