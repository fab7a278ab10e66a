//! Per-tick driver for running operations.
//!
//! The [`Scheduler`] resumes every live operation once per host tick, in the
//! order they were registered. Each registration hands back a [`Handle`], the
//! only way for the owner to hard-stop the operation or read its outcome.

mod handle;
mod scheduler;

pub use handle::{Handle, OperationId};
pub use scheduler::Scheduler;
