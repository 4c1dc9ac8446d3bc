//! The button → portal → form → success journey.
//!
//! [`StageSequencer`] is a plain state machine. Each accepted action returns a
//! [`Choreography`]: an ordered list of phases, each held for a fixed time
//! while its CSS transition plays. [`play`] walks a choreography through a
//! [`Sleeper`] and a set of [`StageHooks`], so the browser glue and the tests
//! share the same driver.
//!
//! The sequencer is busy from the moment a choreography is handed out until
//! its last step finishes; every action during that window is refused.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::{pin, Pin};
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use futures::future::{select, Either};

use crate::config::StageTimings;
use crate::error::SequenceError;

/// The three visible stages; exactly one is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Button,
    Form,
    Success,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Button, Stage::Form, Stage::Success];

    /// Element id of the stage container.
    pub const fn element_id(self) -> &'static str {
        match self {
            Stage::Button => "button-stage",
            Stage::Form => "form-stage",
            Stage::Success => "success-stage",
        }
    }
}

/// Fine-grained position in the journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Button,
    ExitAnimation,
    PortalEntrance,
    FormVisible,
    SuccessTransition,
    Success,
}

impl Phase {
    pub const fn stage(self) -> Stage {
        match self {
            Phase::Button | Phase::ExitAnimation => Stage::Button,
            Phase::PortalEntrance | Phase::FormVisible | Phase::SuccessTransition => Stage::Form,
            Phase::Success => Stage::Success,
        }
    }

    pub const fn next(self) -> Option<Phase> {
        match self {
            Phase::Button => Some(Phase::ExitAnimation),
            Phase::ExitAnimation => Some(Phase::PortalEntrance),
            Phase::PortalEntrance => Some(Phase::FormVisible),
            Phase::FormVisible => Some(Phase::SuccessTransition),
            Phase::SuccessTransition => Some(Phase::Success),
            Phase::Success => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    /// How long the phase's transition runs before the next step may start.
    pub hold: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choreography {
    steps: Vec<Step>,
}

impl Choreography {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn total(&self) -> Duration {
        self.steps.iter().map(|s| s.hold).sum()
    }

    pub fn terminal(&self) -> Option<Phase> {
        self.steps.last().map(|s| s.phase)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Some field failed; nothing moves.
    Rejected,
    Accepted(Choreography),
}

#[derive(Debug)]
pub struct StageSequencer {
    phase: Phase,
    busy: bool,
    timings: StageTimings,
    fields: usize,
}

impl StageSequencer {
    /// `fields` is the number of form inputs cascading in after the portal.
    pub fn new(timings: StageTimings, fields: usize) -> Self {
        Self {
            phase: Phase::Button,
            busy: false,
            timings,
            fields,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stage(&self) -> Stage {
        self.phase.stage()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn ready(&self, action: &'static str, expected: Phase) -> Result<(), SequenceError> {
        if self.busy {
            return Err(SequenceError::Busy);
        }
        if self.phase == Phase::Success {
            return Err(SequenceError::Finished);
        }
        if self.phase != expected {
            return Err(SequenceError::WrongPhase {
                action,
                phase: self.phase,
            });
        }
        Ok(())
    }

    /// Button clicked: leave the button stage and bring up the form.
    pub fn start_transition(&mut self) -> Result<Choreography, SequenceError> {
        self.ready("start the transition", Phase::Button)?;
        self.busy = true;
        Ok(Choreography {
            steps: self.form_steps(),
        })
    }

    /// Form submitted. `all_valid` is the validator's verdict over every field
    /// at the moment of submission.
    pub fn submit(&mut self, all_valid: bool) -> Result<SubmitOutcome, SequenceError> {
        self.ready("submit", Phase::FormVisible)?;
        if !all_valid {
            return Ok(SubmitOutcome::Rejected);
        }
        self.busy = true;
        Ok(SubmitOutcome::Accepted(Choreography {
            steps: self.success_steps(),
        }))
    }

    /// Picks up a choreography that was cancelled part-way, starting after
    /// the current phase. `None` when resting on a stage or already busy.
    pub fn resume(&mut self) -> Option<Choreography> {
        if self.busy {
            return None;
        }
        let full = match self.phase {
            Phase::ExitAnimation | Phase::PortalEntrance => self.form_steps(),
            Phase::SuccessTransition => self.success_steps(),
            Phase::Button | Phase::FormVisible | Phase::Success => return None,
        };
        let current = self.phase;
        let steps = full.into_iter().filter(|s| s.phase > current).collect();
        self.busy = true;
        Some(Choreography { steps })
    }

    fn form_steps(&self) -> Vec<Step> {
        let t = &self.timings;
        vec![
            Step {
                phase: Phase::ExitAnimation,
                hold: t.button_exit(),
            },
            Step {
                phase: Phase::PortalEntrance,
                hold: t.portal_entrance(),
            },
            Step {
                phase: Phase::FormVisible,
                hold: t.form_cascade(self.fields),
            },
        ]
    }

    fn success_steps(&self) -> Vec<Step> {
        let t = &self.timings;
        vec![
            Step {
                phase: Phase::SuccessTransition,
                hold: t.success_exit(),
            },
            Step {
                phase: Phase::Success,
                hold: t.success_portal(),
            },
        ]
    }

    /// Moves into `phase`, which must directly follow the current one.
    pub fn enter(&mut self, phase: Phase) -> Result<(), SequenceError> {
        if self.phase.next() != Some(phase) {
            return Err(SequenceError::WrongPhase {
                action: "advance",
                phase: self.phase,
            });
        }
        self.phase = phase;
        Ok(())
    }

    /// Marks the running choreography as done.
    pub fn finish(&mut self) {
        self.busy = false;
    }
}

/// Suspends until a visual transition has had time to play.
pub trait Sleeper {
    fn sleep(&self, hold: Duration) -> impl Future<Output = ()>;
}

/// Side effects for each phase, applied when the phase is entered (`enter`)
/// and once its hold elapsed (`settle`).
pub trait StageHooks {
    fn enter(&self, phase: Phase);

    fn settle(&self, _phase: Phase) {}
}

/// Shared flag that aborts a running [`play`].
///
/// A running `play` is woken as soon as the token is cancelled, even when the
/// hold it is waiting on never completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<CancelState>);

#[derive(Debug, Default)]
struct CancelState {
    cancelled: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.cancelled.set(true);
        for waker in self.0.wakers.take() {
            waker.wake();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.get()
    }

    /// Re-arms the token, e.g. when the page comes back from the
    /// back/forward cache.
    pub fn reset(&self) {
        self.0.wakers.borrow_mut().clear();
        self.0.cancelled.set(false);
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub fn cancelled(&self) -> Cancelled {
        Cancelled(self.clone())
    }
}

/// Future returned by [`CancelToken::cancelled`].
#[derive(Debug)]
pub struct Cancelled(CancelToken);

impl Future for Cancelled {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let state = &(self.0).0;
        if state.cancelled.get() {
            return Poll::Ready(());
        }
        let mut wakers = state.wakers.borrow_mut();
        if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
            wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

/// Walks `choreography`, entering each phase, waiting out its hold and then
/// settling it. The sequencer is only borrowed between awaits.
///
/// On cancellation the sequencer is left in whatever phase it reached and is
/// no longer busy.
pub async fn play<S, H>(
    sequencer: &RefCell<StageSequencer>,
    choreography: Choreography,
    sleeper: &S,
    hooks: &H,
    cancel: &CancelToken,
) -> Result<Phase, SequenceError>
where
    S: Sleeper,
    H: StageHooks + ?Sized,
{
    for step in choreography.steps {
        if cancel.is_cancelled() {
            sequencer.borrow_mut().finish();
            return Err(SequenceError::Cancelled);
        }
        let entered = sequencer.borrow_mut().enter(step.phase);
        if let Err(e) = entered {
            sequencer.borrow_mut().finish();
            return Err(e);
        }
        log::info!("stage phase -> {:?}", step.phase);
        hooks.enter(step.phase);

        // A cleared timer never resolves its hold, so race it against the token.
        let hold = pin!(sleeper.sleep(step.hold));
        let interrupted = matches!(select(hold, cancel.cancelled()).await, Either::Right(_));
        if interrupted || cancel.is_cancelled() {
            sequencer.borrow_mut().finish();
            return Err(SequenceError::Cancelled);
        }
        hooks.settle(step.phase);
    }
    let mut seq = sequencer.borrow_mut();
    seq.finish();
    Ok(seq.phase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq() -> StageSequencer {
        StageSequencer::new(StageTimings::default(), 3)
    }

    #[test]
    fn phases_map_to_stages() {
        assert_eq!(Phase::ExitAnimation.stage(), Stage::Button);
        assert_eq!(Phase::SuccessTransition.stage(), Stage::Form);
        assert_eq!(Phase::Success.stage(), Stage::Success);
        assert_eq!(Phase::Success.next(), None);
    }

    #[test]
    fn start_yields_form_choreography() {
        let mut s = seq();
        let c = s.start_transition().unwrap();
        let phases: Vec<_> = c.steps().iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            [Phase::ExitAnimation, Phase::PortalEntrance, Phase::FormVisible]
        );
        assert_eq!(c.steps()[2].hold, Duration::from_millis(900));
        assert_eq!(c.total(), Duration::from_millis(2000));
        assert!(s.is_busy());
    }

    #[test]
    fn second_start_while_busy_is_refused() {
        let mut s = seq();
        s.start_transition().unwrap();
        assert_eq!(s.start_transition(), Err(SequenceError::Busy));
        assert_eq!(s.phase(), Phase::Button);
    }

    #[test]
    fn enter_only_moves_forward_one_step() {
        let mut s = seq();
        assert!(s.enter(Phase::FormVisible).is_err());
        s.enter(Phase::ExitAnimation).unwrap();
        assert!(s.enter(Phase::Button).is_err());
        assert_eq!(s.phase(), Phase::ExitAnimation);
    }

    #[test]
    fn submit_before_form_is_wrong_phase() {
        let mut s = seq();
        assert!(matches!(
            s.submit(true),
            Err(SequenceError::WrongPhase {
                phase: Phase::Button,
                ..
            })
        ));
    }

    #[test]
    fn resume_continues_after_interrupted_phase() {
        let mut s = seq();
        assert_eq!(s.resume(), None);
        s.start_transition().unwrap();
        assert_eq!(s.resume(), None, "busy sequencer cannot resume");
        s.enter(Phase::ExitAnimation).unwrap();
        s.finish();

        let rest = s.resume().unwrap();
        let phases: Vec<_> = rest.steps().iter().map(|s| s.phase).collect();
        assert_eq!(phases, [Phase::PortalEntrance, Phase::FormVisible]);
        assert!(s.is_busy());
    }

    #[test]
    fn cancel_wakes_waiting_future() {
        use futures::FutureExt;

        let token = CancelToken::new();
        let mut waiting = token.cancelled();
        assert!((&mut waiting).now_or_never().is_none());
        token.cancel();
        assert!(waiting.now_or_never().is_some());

        token.reset();
        assert!(!token.is_cancelled());
        assert!(token.cancelled().now_or_never().is_none());
    }

    #[test]
    fn invalid_submit_stays_on_form() {
        let mut s = seq();
        s.start_transition().unwrap();
        for p in [Phase::ExitAnimation, Phase::PortalEntrance, Phase::FormVisible] {
            s.enter(p).unwrap();
        }
        s.finish();
        assert_eq!(s.submit(false), Ok(SubmitOutcome::Rejected));
        assert_eq!(s.phase(), Phase::FormVisible);
        assert!(!s.is_busy());
        assert!(matches!(s.submit(true), Ok(SubmitOutcome::Accepted(_))));
    }
}
