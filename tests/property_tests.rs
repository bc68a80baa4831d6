//! Property-based tests for the engine's public contract.
//!
//! These use proptest to verify invariants hold across many randomly
//! generated inputs.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use veer::sched::manual::{ManualClock, ManualScheduler};
use veer::{Predicate, Request, StateChange, StateMachine, TransitionMode};

veer::surface_states! {
    enum Home {
        Default,
        Drawer,
        Swiping,
    }
}

prop_compose! {
    fn arbitrary_state()(variant in 0..3u8) -> Home {
        match variant {
            0 => Home::Default,
            1 => Home::Drawer,
            _ => Home::Swiping,
        }
    }
}

fn machine_with(scheduler: Arc<ManualScheduler>, clock: ManualClock) -> StateMachine<Home> {
    StateMachine::builder()
        .tag("prop")
        .initial(Home::Default)
        .states(Home::ALL.iter().copied())
        .scheduler(scheduler)
        .clock(Arc::new(clock))
        .tick_interval(Duration::from_millis(16))
        .build()
        .unwrap()
}

fn machine() -> StateMachine<Home> {
    machine_with(Arc::new(ManualScheduler::new()), ManualClock::new())
}

proptest! {
    #[test]
    fn unmatched_plans_never_change_anything(state in arbitrary_state(), target in arbitrary_state()) {
        let machine = machine();
        prop_assume!(state != Home::Default);

        // The machine rests in Default; a plan keyed on any other
        // state cannot match.
        let result = machine.submit(StateChange::immediate(state, target));

        prop_assert_eq!(result, None);
        prop_assert_eq!(machine.current_state(), Home::Default);
        prop_assert_eq!(machine.mode(), TransitionMode::None);
        prop_assert_eq!(machine.percent(), 0.0);
    }

    #[test]
    fn immediate_change_always_settles(target in arbitrary_state()) {
        let machine = machine();
        let result = machine.submit(StateChange::immediate(Home::Default, target));

        prop_assert_eq!(result, Some(target));
        prop_assert_eq!(machine.current_state(), target);
        prop_assert_eq!(machine.mode(), TransitionMode::None);
        prop_assert_eq!(machine.percent(), 0.0);
    }

    #[test]
    fn increments_clamp_below_zero_only(raw in -5.0f32..5.0) {
        let machine = machine();
        machine.submit(StateChange::incremental(Home::Default, Home::Drawer));
        machine.submit(StateChange::increment(Home::Drawer, raw));

        prop_assert_eq!(machine.percent(), raw.max(0.0));
        prop_assert_eq!(machine.mode(), TransitionMode::Incremental);
    }

    #[test]
    fn flings_terminate_in_bounded_time(start in 0.0f32..1.0, commit in proptest::bool::ANY) {
        let scheduler = Arc::new(ManualScheduler::new());
        let clock = ManualClock::new();
        let machine = machine_with(scheduler.clone(), clock.clone());

        machine.submit(StateChange::incremental(Home::Default, Home::Drawer));
        machine.submit(StateChange::increment(Home::Drawer, start));
        let request = if commit {
            Request::fitted_commit()
        } else {
            Request::fitted_abort()
        };
        machine.submit(
            StateChange::builder()
                .maybe(Predicate::during_incremental(Home::Drawer), request)
                .build(),
        );

        // At the fallback floor of 0.002/ms, a full sweep is 500 ms;
        // 16 ms ticks cross the threshold within 33 ticks.
        let mut ticks = 0;
        while machine.mode() == TransitionMode::Incremental {
            clock.advance(Duration::from_millis(16));
            scheduler.fire_tick();
            ticks += 1;
            prop_assert!(ticks <= 40, "fling did not terminate");
        }

        let expected = if commit { Home::Drawer } else { Home::Default };
        prop_assert_eq!(machine.current_state(), expected);
        prop_assert_eq!(machine.percent(), 0.0);
        prop_assert_eq!(scheduler.live_tasks(), 0);
    }

    #[test]
    fn plans_are_inert_until_submitted(entries in 1..8usize) {
        let machine = machine();
        let mut builder = StateChange::builder();
        for _ in 0..entries {
            builder = builder.maybe(
                Predicate::during_incremental(Home::Swiping),
                Request::commit(),
            );
        }
        let plan = builder.build();

        prop_assert_eq!(plan.len(), entries);
        prop_assert_eq!(machine.current_state(), Home::Default);
        prop_assert_eq!(machine.mode(), TransitionMode::None);
    }
}
