use std::fmt;

use crate::error::{Result, WaitError};
use crate::sched::{Handle, Scheduler};
use crate::time::ClockReading;

use super::outcome::Outcome;
use super::policy::{Cadence, Condition, Pacer, Termination};

/// One-shot callback run when an operation finishes.
pub type Callback = Box<dyn FnOnce()>;

/// Callback run once per cycle while an operation keeps going.
pub type TickFn = Box<dyn FnMut()>;

/// Result of resuming an operation for one host tick.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Step {
    /// Still suspended; resume again next tick.
    Pending,
    /// Terminal. Further steps return the same outcome and run nothing.
    Finished(Outcome),
}

/// A single wait, driven to exactly one [`Outcome`].
///
/// Usually created through [`crate::ops`] or [`Operation::builder`] and then
/// owned by a [`Scheduler`]. Hosts with their own loop may also call
/// [`Operation::step`] directly.
pub struct Operation {
    state: State,
}

enum State {
    Running(Box<Running>),
    Finished(Outcome),
}

struct Running {
    termination: Termination,
    pacer: Pacer,
    cancel_when: Option<Condition>,
    on_tick: Option<TickFn>,
    on_complete: Option<Callback>,
    on_cancel: Option<Callback>,
}

impl Operation {
    pub fn builder() -> OperationBuilder {
        OperationBuilder::default()
    }

    /// `Some` once the operation has finished.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            State::Running(_) => None,
            State::Finished(outcome) => Some(outcome),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    /// Resumes the operation for one host tick.
    ///
    /// Order of evaluation:
    /// 1. host not alive: `CanceledBySystem`, no callback
    /// 2. consume one tick of the cadence; mid-cycle returns `Pending`
    /// 3. cancel predicate true: `Canceled`, cancel callback
    /// 4. termination policy satisfied: `Completed`, completion callback
    /// 5. otherwise the tick callback runs and the next cycle starts
    pub fn step(&mut self, reading: ClockReading) -> Step {
        let run = match &mut self.state {
            State::Finished(outcome) => {
                log::warn!("step() on an operation that already finished ({outcome})");
                return Step::Finished(*outcome);
            }
            State::Running(run) => run,
        };

        if !reading.alive {
            return self.finish(Outcome::CanceledBySystem);
        }

        run.termination.observe(reading.dt);
        if !run.pacer.pass(reading.dt) {
            return Step::Pending;
        }

        if run.cancel_when.as_mut().is_some_and(|cancel| cancel()) {
            return self.finish(Outcome::Canceled);
        }

        if run.termination.advance() {
            return self.finish(Outcome::Completed);
        }

        if let Some(tick) = run.on_tick.as_mut() {
            tick();
        }
        run.pacer.rearm();

        Step::Pending
    }

    /// Ends the operation as `Canceled` without running any callback.
    ///
    /// Returns the existing outcome if it had already finished.
    pub fn stop(&mut self) -> Outcome {
        if let State::Finished(outcome) = self.state {
            return outcome;
        }
        self.state = State::Finished(Outcome::Canceled);
        Outcome::Canceled
    }

    fn finish(&mut self, outcome: Outcome) -> Step {
        let State::Running(run) = std::mem::replace(&mut self.state, State::Finished(outcome)) else {
            return Step::Finished(outcome);
        };

        // Predicates and the tick callback are dropped here, before the
        // terminal callback runs.
        let Running {
            on_complete,
            on_cancel,
            ..
        } = *run;

        let callback = match outcome {
            Outcome::Completed => on_complete,
            Outcome::Canceled => on_cancel,
            Outcome::CanceledBySystem => None,
        };

        if let Some(callback) = callback {
            callback();
        }

        Step::Finished(outcome)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            State::Running(run) => f
                .debug_struct("Operation")
                .field("termination", &run.termination)
                .field("cancelable", &run.cancel_when.is_some())
                .finish_non_exhaustive(),
            State::Finished(outcome) => f
                .debug_struct("Operation")
                .field("outcome", outcome)
                .finish(),
        }
    }
}

/// General-purpose operation constructor.
///
/// ```rust
/// use sandglass_engine::{Operation, Scheduler};
/// use sandglass_engine::time::ManualClock;
///
/// let scheduler = Scheduler::new();
/// let clock = ManualClock::default();
///
/// let handle = Operation::builder()
///     .frames(2)
///     .cancel_when(|| false)
///     .on_complete(|| println!("two frames later"))
///     .start(&scheduler)
///     .unwrap();
///
/// scheduler.tick(&clock);
/// scheduler.tick(&clock);
/// assert!(handle.is_finished());
/// ```
#[derive(Default)]
pub struct OperationBuilder {
    termination: Option<Termination>,
    cadence: Cadence,
    cancel_when: Option<Condition>,
    on_tick: Option<TickFn>,
    on_complete: Option<Callback>,
    on_cancel: Option<Callback>,
}

impl OperationBuilder {
    pub fn termination(mut self, termination: Termination) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Finish after `n` cycles.
    pub fn frames(self, n: u32) -> Self {
        self.termination(Termination::Frames(n))
    }

    /// Finish once `seconds` of time scaled by `scale` have elapsed.
    pub fn elapsed(self, seconds: f32, scale: impl FnMut() -> f32 + 'static) -> Self {
        self.termination(Termination::elapsed(seconds, scale))
    }

    pub fn until(self, condition: impl FnMut() -> bool + 'static) -> Self {
        self.termination(Termination::until(condition))
    }

    pub fn while_(self, condition: impl FnMut() -> bool + 'static) -> Self {
        self.termination(Termination::while_(condition))
    }

    pub fn forever(self) -> Self {
        self.termination(Termination::Forever)
    }

    /// Defaults to [`Cadence::every_tick`].
    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = cadence;
        self
    }

    /// A cycle spans `skip` host ticks.
    pub fn cadence_frames(self, skip: u32) -> Self {
        self.cadence(Cadence::Frames(skip))
    }

    /// A cycle spans `seconds` of time scaled by `scale`.
    pub fn cadence_seconds(self, seconds: f32, scale: impl FnMut() -> f32 + 'static) -> Self {
        self.cadence(Cadence::dilation(seconds, scale))
    }

    pub fn cancel_when(mut self, cancel: impl FnMut() -> bool + 'static) -> Self {
        self.cancel_when = Some(Box::new(cancel));
        self
    }

    pub fn on_tick(mut self, tick: impl FnMut() + 'static) -> Self {
        self.on_tick = Some(Box::new(tick));
        self
    }

    pub fn on_complete(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn on_cancel(mut self, callback: impl FnOnce() + 'static) -> Self {
        self.on_cancel = Some(Box::new(callback));
        self
    }

    /// Validates the configuration into a ready-to-step operation.
    pub fn build(self) -> Result<Operation> {
        let termination = self.termination.ok_or(WaitError::MissingPolicy)?;
        termination.validate()?;
        self.cadence.validate()?;

        if termination.is_forever() && self.on_tick.is_none() {
            return Err(WaitError::MissingTickCallback);
        }

        Ok(Operation {
            state: State::Running(Box::new(Running {
                termination,
                pacer: Pacer::from(self.cadence),
                cancel_when: self.cancel_when,
                on_tick: self.on_tick,
                on_complete: self.on_complete,
                on_cancel: self.on_cancel,
            })),
        })
    }

    /// Builds the operation and registers it; it is first resumed on the
    /// scheduler's next tick.
    pub fn start(self, scheduler: &Scheduler) -> Result<Handle> {
        Ok(scheduler.spawn(self.build()?))
    }
}
