//! End-to-end scenarios for the transition engine, driven through the
//! deterministic scheduler and clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use veer::sched::manual::{ManualClock, ManualScheduler};
use veer::{
    ListenerToken, Predicate, Request, StateChange, StateListener, StateMachine, TransitionMode,
};

veer::surface_states! {
    enum Home {
        Default,
        Drawer,
        Swiping,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Note {
    Start { from: Home, to: Home },
    Incremental { from: Home, to: Home, percent: f32 },
    End { from: Home, to: Home },
}

#[derive(Default)]
struct Recorder {
    notes: Mutex<Vec<Note>>,
}

impl Recorder {
    fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }
}

impl StateListener<Home> for Recorder {
    fn on_start(&self, from: Home, to: Home) {
        self.notes.lock().unwrap().push(Note::Start { from, to });
    }

    fn on_incremental(&self, from: Home, to: Home, percent: f32) {
        self.notes
            .lock()
            .unwrap()
            .push(Note::Incremental { from, to, percent });
    }

    fn on_end(&self, from: Home, to: Home) {
        self.notes.lock().unwrap().push(Note::End { from, to });
    }
}

struct Fixture {
    machine: StateMachine<Home>,
    scheduler: Arc<ManualScheduler>,
    clock: ManualClock,
}

fn fixture() -> Fixture {
    let scheduler = Arc::new(ManualScheduler::new());
    let clock = ManualClock::new();
    let machine = StateMachine::builder()
        .tag("home")
        .initial(Home::Default)
        .states(Home::ALL.iter().copied())
        .scheduler(scheduler.clone())
        .clock(Arc::new(clock.clone()))
        .tick_interval(Duration::from_millis(16))
        .build()
        .unwrap();
    Fixture {
        machine,
        scheduler,
        clock,
    }
}

#[test]
fn immediate_change_notifies_every_listener_exactly_once() {
    let f = fixture();
    let first = Arc::new(Recorder::default());
    let second = Arc::new(Recorder::default());
    f.machine.register_listener(first.clone());
    f.machine.register_listener(second.clone());

    f.machine
        .submit(StateChange::immediate(Home::Default, Home::Drawer));
    f.scheduler.drain_ui();

    let expected = vec![Note::End {
        from: Home::Default,
        to: Home::Drawer,
    }];
    assert_eq!(first.notes(), expected);
    assert_eq!(second.notes(), expected);
}

#[test]
fn incremental_flow_delivers_start_increments_end_in_order() {
    let f = fixture();
    let recorder = Arc::new(Recorder::default());
    f.machine.register_listener(recorder.clone());

    f.machine
        .submit(StateChange::incremental(Home::Default, Home::Swiping));
    f.machine.submit(StateChange::increment(Home::Swiping, 0.5));
    f.machine.submit(
        StateChange::builder()
            .maybe(Predicate::during_incremental(Home::Swiping), Request::commit())
            .build(),
    );
    f.scheduler.drain_ui();

    assert_eq!(
        recorder.notes(),
        vec![
            Note::Start {
                from: Home::Default,
                to: Home::Swiping,
            },
            Note::Incremental {
                from: Home::Default,
                to: Home::Swiping,
                percent: 0.5,
            },
            Note::End {
                from: Home::Default,
                to: Home::Swiping,
            },
        ]
    );
    assert_eq!(f.machine.current_state(), Home::Swiping);
    assert_eq!(f.machine.percent(), 0.0);
}

#[test]
fn abort_reports_arriving_back_at_the_origin() {
    let f = fixture();
    let recorder = Arc::new(Recorder::default());
    f.machine.register_listener(recorder.clone());

    f.machine
        .submit(StateChange::incremental(Home::Default, Home::Swiping));
    f.machine.submit(StateChange::increment(Home::Swiping, 0.3));
    f.machine.submit(
        StateChange::builder()
            .maybe(Predicate::during_incremental(Home::Swiping), Request::abort())
            .build(),
    );
    f.scheduler.drain_ui();

    assert_eq!(f.machine.current_state(), Home::Default);
    let notes = recorder.notes();
    assert_eq!(
        notes.last(),
        Some(&Note::End {
            from: Home::Swiping,
            to: Home::Default,
        })
    );
}

#[test]
fn speculative_plan_is_rejected_mid_drag() {
    let f = fixture();
    let went = f
        .machine
        .submit(StateChange::incremental(Home::Default, Home::Swiping));
    assert_eq!(went, Some(Home::Swiping));
    assert!(f.machine.in_state(Home::Swiping));
    assert_eq!(f.machine.mode(), TransitionMode::Incremental);

    let rejected = f
        .machine
        .submit(StateChange::immediate(Home::Swiping, Home::Default));
    assert_eq!(rejected, None);
    assert_eq!(f.machine.current_state(), Home::Swiping);
    assert_eq!(f.machine.mode(), TransitionMode::Incremental);
}

#[test]
fn timed_transition_progresses_then_settles() {
    let f = fixture();
    let recorder = Arc::new(Recorder::default());
    f.machine.register_listener(recorder.clone());

    f.machine.submit(StateChange::timed(
        Home::Default,
        Home::Drawer,
        Duration::from_millis(300),
    ));

    f.clock.advance(Duration::from_millis(150));
    f.scheduler.fire_tick();
    let midway = f.machine.percent();
    assert!(midway > 0.0 && midway < 1.0, "midway percent {midway}");
    assert_eq!(f.machine.mode(), TransitionMode::Timed);

    f.clock.advance(Duration::from_millis(160));
    f.scheduler.fire_tick();
    assert_eq!(f.machine.percent(), 0.0);
    assert_eq!(f.machine.mode(), TransitionMode::None);
    assert_eq!(f.machine.current_state(), Home::Drawer);

    f.scheduler.drain_ui();
    let notes = recorder.notes();
    assert_eq!(
        notes.first(),
        Some(&Note::Start {
            from: Home::Default,
            to: Home::Drawer,
        })
    );
    assert_eq!(
        notes.last(),
        Some(&Note::End {
            from: Home::Default,
            to: Home::Drawer,
        })
    );
    let increments = notes
        .iter()
        .filter(|n| matches!(n, Note::Incremental { .. }))
        .count();
    assert_eq!(increments, 1);
}

#[test]
fn fling_commit_completes_and_notifies_once() {
    let f = fixture();
    let recorder = Arc::new(Recorder::default());
    f.machine.register_listener(recorder.clone());

    f.machine
        .submit(StateChange::incremental(Home::Default, Home::Drawer));
    f.clock.advance(Duration::from_millis(100));
    f.machine.submit(StateChange::increment(Home::Drawer, 0.6));
    f.machine.submit(
        StateChange::builder()
            .maybe(
                Predicate::during_incremental(Home::Drawer),
                Request::fitted_commit(),
            )
            .build(),
    );

    let mut ticks = 0;
    while f.machine.mode() == TransitionMode::Incremental {
        f.clock.advance(Duration::from_millis(16));
        f.scheduler.fire_tick();
        ticks += 1;
        assert!(ticks < 20, "fling failed to terminate");
    }
    f.scheduler.drain_ui();

    assert_eq!(f.machine.current_state(), Home::Drawer);
    let notes = recorder.notes();
    let ends = notes
        .iter()
        .filter(|n| matches!(n, Note::End { .. }))
        .count();
    assert_eq!(ends, 1);
    assert_eq!(
        notes.last(),
        Some(&Note::End {
            from: Home::Default,
            to: Home::Drawer,
        })
    );
}

struct SelfRemover {
    machine: StateMachine<Home>,
    token: Mutex<Option<ListenerToken>>,
    fired: AtomicUsize,
}

impl StateListener<Home> for SelfRemover {
    fn on_end(&self, _from: Home, _to: Home) {
        self.fired.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = self.token.lock().unwrap().take() {
            self.machine.unregister_listener(token);
        }
    }
}

#[test]
fn listener_removing_itself_does_not_skip_the_others() {
    let f = fixture();
    let remover = Arc::new(SelfRemover {
        machine: f.machine.clone(),
        token: Mutex::new(None),
        fired: AtomicUsize::new(0),
    });
    let token = f.machine.register_listener(remover.clone());
    *remover.token.lock().unwrap() = Some(token);
    let bystander = Arc::new(Recorder::default());
    f.machine.register_listener(bystander.clone());

    f.machine
        .submit(StateChange::immediate(Home::Default, Home::Drawer));
    f.scheduler.drain_ui();
    assert_eq!(remover.fired.load(Ordering::SeqCst), 1);
    assert_eq!(bystander.notes().len(), 1);

    // The remover is gone for the next transition.
    f.machine
        .submit(StateChange::immediate(Home::Drawer, Home::Default));
    f.scheduler.drain_ui();
    assert_eq!(remover.fired.load(Ordering::SeqCst), 1);
    assert_eq!(bystander.notes().len(), 2);
}

#[test]
#[should_panic(expected = "unknown listener")]
fn unregistering_an_unknown_listener_panics() {
    let f = fixture();
    let recorder = Arc::new(Recorder::default());
    let token = f.machine.register_listener(recorder);
    f.machine.unregister_listener(token);
    f.machine.unregister_listener(token);
}

#[test]
fn concurrent_submissions_are_serialized() {
    let f = fixture();
    let machine = f.machine;
    let applied = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let machine = machine.clone();
            let applied = applied.clone();
            std::thread::spawn(move || {
                for _ in 0..8 {
                    let plan = StateChange::builder()
                        .maybe(
                            Predicate::at(Home::Default),
                            Request::immediate(Home::Drawer),
                        )
                        .maybe(
                            Predicate::at(Home::Drawer),
                            Request::immediate(Home::Default),
                        )
                        .build();
                    if machine.submit(plan).is_some() {
                        applied.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Every submission matched one entry, and every applied transition
    // was journaled: no interleaving lost an update.
    assert_eq!(applied.load(Ordering::SeqCst), 32);
    assert_eq!(machine.recent_transitions().len(), 32);
    assert_eq!(machine.mode(), TransitionMode::None);
}

#[test]
fn snapshot_round_trips_through_json() {
    let f = fixture();
    f.machine
        .submit(StateChange::incremental(Home::Default, Home::Drawer));
    f.machine.submit(StateChange::increment(Home::Drawer, 0.25));

    let json = serde_json::to_value(f.machine.snapshot()).unwrap();
    assert_eq!(json["last"], "Default");
    assert_eq!(json["current"], "Drawer");
    assert_eq!(json["mode"], "Incremental");
    assert_eq!(json["percent"], 0.25);
}
