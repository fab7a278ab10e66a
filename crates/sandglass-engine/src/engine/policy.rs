use std::fmt;

use crate::error::{check_seconds, Result};
use crate::time::{sample, ScaleFn};

/// Boxed predicate, evaluated at most once per cycle.
pub type Condition = Box<dyn FnMut() -> bool>;

/// When an operation finishes on its own.
pub enum Termination {
    /// Done after this many cycles. Zero is done on the first cycle.
    Frames(u32),

    /// Done once `seconds` of scaled time have elapsed. `scale` is called on
    /// every tick, including ticks in the middle of a cycle.
    Elapsed { seconds: f32, scale: ScaleFn },

    /// Done on the first cycle where the condition returns `true`.
    Until(Condition),

    /// Never done; only liveness, cancellation or a hard stop end it.
    Forever,
}

impl Termination {
    pub fn until(condition: impl FnMut() -> bool + 'static) -> Self {
        Termination::Until(Box::new(condition))
    }

    /// Done on the first cycle where the condition returns `false`.
    ///
    /// This is [`Termination::until`] over the negated condition.
    pub fn while_(mut condition: impl FnMut() -> bool + 'static) -> Self {
        Self::until(move || !condition())
    }

    pub fn elapsed(seconds: f32, scale: impl FnMut() -> f32 + 'static) -> Self {
        Termination::Elapsed {
            seconds,
            scale: Box::new(scale),
        }
    }

    pub fn is_forever(&self) -> bool {
        matches!(self, Termination::Forever)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Termination::Elapsed { seconds, .. } = self {
            check_seconds("delay", *seconds)?;
        }
        Ok(())
    }

    /// Accounts for one host tick. Runs on every tick the operation is resumed.
    pub(crate) fn observe(&mut self, dt: f32) {
        if let Termination::Elapsed { seconds, scale } = self {
            *seconds -= scaled(dt, scale);
        }
    }

    /// Evaluates the policy at the end of a cycle. `true` means done.
    pub(crate) fn advance(&mut self) -> bool {
        match self {
            Termination::Frames(left) => {
                *left = left.saturating_sub(1);
                *left == 0
            }
            Termination::Elapsed { seconds, .. } => *seconds <= 0.0,
            Termination::Until(condition) => condition(),
            Termination::Forever => false,
        }
    }
}

impl fmt::Debug for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Frames(n) => f.debug_tuple("Frames").field(n).finish(),
            Termination::Elapsed { seconds, .. } => f
                .debug_struct("Elapsed")
                .field("seconds", seconds)
                .finish_non_exhaustive(),
            Termination::Until(_) => f.write_str("Until(..)"),
            Termination::Forever => f.write_str("Forever"),
        }
    }
}

/// Spacing between the points where an operation evaluates itself.
pub enum Cadence {
    /// A cycle spans this many host ticks. Zero behaves like one: the
    /// operation still yields to the host between evaluations.
    Frames(u32),

    /// A cycle lasts until `seconds` of scaled time have passed, and always at
    /// least one tick.
    Dilation { seconds: f32, scale: ScaleFn },
}

impl Cadence {
    pub fn every_tick() -> Self {
        Cadence::Frames(0)
    }

    pub fn dilation(seconds: f32, scale: impl FnMut() -> f32 + 'static) -> Self {
        Cadence::Dilation {
            seconds,
            scale: Box::new(scale),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Cadence::Dilation { seconds, .. } = self {
            check_seconds("tick dilation", *seconds)?;
        }
        Ok(())
    }
}

impl Default for Cadence {
    fn default() -> Self {
        Self::every_tick()
    }
}

impl fmt::Debug for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Frames(n) => f.debug_tuple("Frames").field(n).finish(),
            Cadence::Dilation { seconds, .. } => f
                .debug_struct("Dilation")
                .field("seconds", seconds)
                .finish_non_exhaustive(),
        }
    }
}

/// Scaled time consumed by one tick. A `NaN` product counts as no time so a
/// budget can never become `NaN`.
fn scaled(dt: f32, scale: &mut ScaleFn) -> f32 {
    let step = dt * sample(scale);
    if step.is_nan() { 0.0 } else { step }
}

/// Running countdown for one [`Cadence`].
pub(crate) enum Pacer {
    Ticks { every: u32, left: u32 },
    Scaled { every: f32, left: f32, scale: ScaleFn },
}

impl Pacer {
    /// Consumes one host tick. `true` when the current cycle's wait is over.
    pub(crate) fn pass(&mut self, dt: f32) -> bool {
        match self {
            Pacer::Ticks { left, .. } => {
                *left = left.saturating_sub(1);
                *left == 0
            }
            Pacer::Scaled { left, scale, .. } => {
                *left -= scaled(dt, scale);
                *left <= 0.0
            }
        }
    }

    /// Starts the next cycle. The scaled budget does not carry overshoot.
    pub(crate) fn rearm(&mut self) {
        match self {
            Pacer::Ticks { every, left } => *left = *every,
            Pacer::Scaled { every, left, .. } => *left = *every,
        }
    }
}

impl From<Cadence> for Pacer {
    fn from(cadence: Cadence) -> Self {
        match cadence {
            Cadence::Frames(n) => {
                let every = n.max(1);
                Pacer::Ticks { every, left: every }
            }
            Cadence::Dilation { seconds, scale } => Pacer::Scaled {
                every: seconds,
                left: seconds,
                scale,
            },
        }
    }
}
