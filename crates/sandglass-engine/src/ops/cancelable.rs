//! Waits that the caller cancels through a predicate and then awaits.
//!
//! These take no completion callbacks. The caller reads the [`Outcome`]
//! from the returned [`Handle`] (polling it or awaiting it) and must stop
//! everything on `CanceledBySystem`.
//!
//! [`Outcome`]: crate::Outcome

use crate::engine::Operation;
use crate::error::Result;
use crate::sched::{Handle, Scheduler};
use crate::time::realtime;

/// Waits `frames` ticks unless `cancel` returns `true` first.
pub fn skip_frames(
    scheduler: &Scheduler,
    frames: u32,
    cancel: impl FnMut() -> bool + 'static,
) -> Result<Handle> {
    Operation::builder()
        .frames(frames)
        .cancel_when(cancel)
        .start(scheduler)
}

/// Waits `seconds` of scaled time (global scale) unless canceled.
pub fn delay(
    scheduler: &Scheduler,
    seconds: f32,
    cancel: impl FnMut() -> bool + 'static,
) -> Result<Handle> {
    Operation::builder()
        .elapsed(seconds, scheduler.time_scale().getter())
        .cancel_when(cancel)
        .start(scheduler)
}

/// Waits `seconds` of unscaled time unless canceled.
pub fn delay_realtime(
    scheduler: &Scheduler,
    seconds: f32,
    cancel: impl FnMut() -> bool + 'static,
) -> Result<Handle> {
    Operation::builder()
        .elapsed(seconds, realtime())
        .cancel_when(cancel)
        .start(scheduler)
}

/// Waits until `condition` returns `true`, checked every `skip_frames` ticks.
pub fn wait_until(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    cancel: impl FnMut() -> bool + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    Operation::builder()
        .until(condition)
        .cadence_frames(skip_frames)
        .cancel_when(cancel)
        .start(scheduler)
}

pub fn wait_while(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    cancel: impl FnMut() -> bool + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    wait_until(scheduler, move || !condition(), cancel, skip_frames)
}

/// Runs `on_tick` every `skip_frames` ticks until `condition` returns `true`.
pub fn repeat_until(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    cancel: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    Operation::builder()
        .until(condition)
        .cadence_frames(skip_frames)
        .cancel_when(cancel)
        .on_tick(on_tick)
        .start(scheduler)
}

pub fn repeat_while(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    cancel: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    repeat_until(scheduler, move || !condition(), cancel, on_tick, skip_frames)
}
