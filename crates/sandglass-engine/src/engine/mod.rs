//! Suspension engine.
//!
//! An [`Operation`] is an explicit state machine advanced by [`Operation::step`]
//! once per host tick. Every wait and repeat in [`crate::ops`] is one
//! configuration of it:
//!
//! - a [`Termination`] policy: frame count, elapsed scaled time, condition, or forever
//! - a [`Cadence`]: how many ticks (or how much scaled time) one cycle spans
//! - optional cancel predicate, tick, completion and cancellation callbacks
//!
//! Evaluation order on the tick that ends a cycle is fixed: liveness, then the
//! cancel predicate, then the termination policy, then the tick callback.
//! Liveness is also checked on every intermediate tick of a cycle.

mod operation;
mod outcome;
mod policy;

pub use operation::{Callback, Operation, OperationBuilder, Step, TickFn};
pub use outcome::Outcome;
pub use policy::{Cadence, Condition, Termination};
