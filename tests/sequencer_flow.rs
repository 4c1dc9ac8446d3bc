#![cfg(not(target_arch = "wasm32"))]

use std::cell::RefCell;
use std::future::{pending, ready, Future};
use std::rc::Rc;
use std::time::Duration;

use futures::executor::block_on;
use futures::FutureExt;
use neon_fx::config::StageTimings;
use neon_fx::error::SequenceError;
use neon_fx::sequencer::{play, CancelToken, StageHooks, Sleeper, SubmitOutcome};
use neon_fx::{Phase, Stage, StageSequencer};

/// Returns immediately, remembering each requested hold.
#[derive(Default)]
struct NoWait {
    holds: RefCell<Vec<Duration>>,
}

impl Sleeper for NoWait {
    fn sleep(&self, hold: Duration) -> impl Future<Output = ()> {
        self.holds.borrow_mut().push(hold);
        ready(())
    }
}

/// Presses the button again while the first transition is mid-flight.
struct Impatient {
    sequencer: Rc<RefCell<StageSequencer>>,
    refusals: RefCell<Vec<SequenceError>>,
}

impl Sleeper for Impatient {
    fn sleep(&self, _hold: Duration) -> impl Future<Output = ()> {
        if let Err(e) = self.sequencer.borrow_mut().start_transition() {
            self.refusals.borrow_mut().push(e);
        }
        ready(())
    }
}

/// Cancels after the first hold.
struct Navigates(CancelToken);

impl Sleeper for Navigates {
    fn sleep(&self, _hold: Duration) -> impl Future<Output = ()> {
        self.0.cancel();
        ready(())
    }
}

/// Cancels and then never wakes, like a `setTimeout` cleared on page hide.
struct ClearedTimer(CancelToken);

impl Sleeper for ClearedTimer {
    fn sleep(&self, _hold: Duration) -> impl Future<Output = ()> {
        self.0.cancel();
        pending()
    }
}

/// Never resolves unless someone cancels from outside.
struct Stalled;

impl Sleeper for Stalled {
    fn sleep(&self, _hold: Duration) -> impl Future<Output = ()> {
        pending()
    }
}

#[derive(Default)]
struct Journal {
    events: RefCell<Vec<(&'static str, Phase)>>,
}

impl StageHooks for Journal {
    fn enter(&self, phase: Phase) {
        self.events.borrow_mut().push(("enter", phase));
    }

    fn settle(&self, phase: Phase) {
        self.events.borrow_mut().push(("settle", phase));
    }
}

fn sequencer() -> Rc<RefCell<StageSequencer>> {
    Rc::new(RefCell::new(StageSequencer::new(StageTimings::default(), 2)))
}

#[test]
fn button_reaches_form_with_expected_holds() {
    let seq = sequencer();
    let sleeper = NoWait::default();
    let hooks = Journal::default();

    let choreography = seq.borrow_mut().start_transition().unwrap();
    let done = block_on(play(&seq, choreography, &sleeper, &hooks, &CancelToken::new()));

    assert_eq!(done, Ok(Phase::FormVisible));
    assert_eq!(seq.borrow().stage(), Stage::Form);
    assert!(!seq.borrow().is_busy());
    assert_eq!(
        *sleeper.holds.borrow(),
        vec![
            Duration::from_millis(1000),
            Duration::from_millis(100),
            Duration::from_millis(700),
        ]
    );
    assert_eq!(
        *hooks.events.borrow(),
        vec![
            ("enter", Phase::ExitAnimation),
            ("settle", Phase::ExitAnimation),
            ("enter", Phase::PortalEntrance),
            ("settle", Phase::PortalEntrance),
            ("enter", Phase::FormVisible),
            ("settle", Phase::FormVisible),
        ]
    );
}

#[test]
fn repeated_clicks_during_transition_change_nothing() {
    let seq = sequencer();
    let sleeper = Impatient {
        sequencer: seq.clone(),
        refusals: RefCell::new(Vec::new()),
    };
    let hooks = Journal::default();

    let choreography = seq.borrow_mut().start_transition().unwrap();
    let done = block_on(play(&seq, choreography, &sleeper, &hooks, &CancelToken::new()));

    assert_eq!(done, Ok(Phase::FormVisible));
    assert_eq!(*sleeper.refusals.borrow(), vec![SequenceError::Busy; 3]);
    let entered = hooks
        .events
        .borrow()
        .iter()
        .filter(|(kind, phase)| *kind == "enter" && *phase == Phase::ExitAnimation)
        .count();
    assert_eq!(entered, 1);

    // Once settled on the form the button is gone for good.
    assert!(matches!(
        seq.borrow_mut().start_transition(),
        Err(SequenceError::WrongPhase { .. })
    ));
}

#[test]
fn invalid_submit_keeps_form_visible() {
    let seq = sequencer();
    let choreography = seq.borrow_mut().start_transition().unwrap();
    block_on(play(&seq, choreography, &NoWait::default(), &Journal::default(), &CancelToken::new()))
        .unwrap();

    let outcome = seq.borrow_mut().submit(false).unwrap();
    assert_eq!(outcome, SubmitOutcome::Rejected);
    assert_eq!(seq.borrow().phase(), Phase::FormVisible);
    assert!(!seq.borrow().is_busy());
}

#[test]
fn success_is_reached_exactly_once() {
    let seq = sequencer();
    let hooks = Journal::default();
    let cancel = CancelToken::new();

    let to_form = seq.borrow_mut().start_transition().unwrap();
    block_on(play(&seq, to_form, &NoWait::default(), &hooks, &cancel)).unwrap();

    let SubmitOutcome::Accepted(to_success) = seq.borrow_mut().submit(true).unwrap() else {
        panic!("valid submit was rejected");
    };
    assert_eq!(to_success.terminal(), Some(Phase::Success));
    assert_eq!(to_success.total(), Duration::from_millis(1100));

    let done = block_on(play(&seq, to_success, &NoWait::default(), &hooks, &cancel));
    assert_eq!(done, Ok(Phase::Success));
    assert_eq!(seq.borrow().stage(), Stage::Success);

    assert_eq!(seq.borrow_mut().submit(true), Err(SequenceError::Finished));
    let successes = hooks
        .events
        .borrow()
        .iter()
        .filter(|(kind, phase)| *kind == "enter" && *phase == Phase::Success)
        .count();
    assert_eq!(successes, 1);
}

#[test]
fn cancellation_stops_mid_choreography() {
    let seq = sequencer();
    let cancel = CancelToken::new();
    let hooks = Journal::default();

    let choreography = seq.borrow_mut().start_transition().unwrap();
    let done = block_on(play(
        &seq,
        choreography,
        &Navigates(cancel.clone()),
        &hooks,
        &cancel,
    ));

    assert_eq!(done, Err(SequenceError::Cancelled));
    assert_eq!(seq.borrow().phase(), Phase::ExitAnimation);
    assert!(!seq.borrow().is_busy());
    assert_eq!(*hooks.events.borrow(), vec![("enter", Phase::ExitAnimation)]);
}

#[test]
fn cancellation_releases_a_hold_that_never_fires() {
    let seq = sequencer();
    let cancel = CancelToken::new();

    let choreography = seq.borrow_mut().start_transition().unwrap();
    let done = block_on(play(
        &seq,
        choreography,
        &ClearedTimer(cancel.clone()),
        &Journal::default(),
        &cancel,
    ));

    assert_eq!(done, Err(SequenceError::Cancelled));
    assert!(!seq.borrow().is_busy());
    assert_eq!(seq.borrow().phase(), Phase::ExitAnimation);
}

#[test]
fn cancelling_from_outside_wakes_a_stalled_play() {
    let seq = sequencer();
    let cancel = CancelToken::new();
    let choreography = seq.borrow_mut().start_transition().unwrap();

    let hooks = Journal::default();
    let mut running = Box::pin(play(&seq, choreography, &Stalled, &hooks, &cancel));
    assert!(running.as_mut().now_or_never().is_none());
    assert!(seq.borrow().is_busy());

    cancel.cancel();
    assert_eq!(running.now_or_never(), Some(Err(SequenceError::Cancelled)));
    assert!(!seq.borrow().is_busy());

    // Restored from the back/forward cache: the interrupted transition finishes.
    cancel.reset();
    let rest = seq.borrow_mut().resume().unwrap();
    let done = block_on(play(&seq, rest, &NoWait::default(), &Journal::default(), &cancel));
    assert_eq!(done, Ok(Phase::FormVisible));
    assert!(!seq.borrow().is_busy());
}
