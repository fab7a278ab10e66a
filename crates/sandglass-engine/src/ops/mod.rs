//! Named wait and repeat operations.
//!
//! Each function configures an [`Operation`] and registers it with the given
//! scheduler, returning the owner [`Handle`] immediately. The work runs on the
//! scheduler's subsequent ticks; nothing runs inside the call itself.
//!
//! Naming follows one scheme:
//!
//! | Suffix | Time source |
//! |--------|-------------|
//! | *(none)* | scaled by the scheduler's global [`TimeScale`](crate::time::TimeScale) |
//! | `_realtime` | unscaled |
//! | `_custom_time_scale` | scaled by a caller-supplied getter |
//!
//! `*_frames_*` variants space evaluations by host ticks instead of time.
//! Every `*_while` function is the matching `*_until` function over the
//! negated condition.
//!
//! Operations with a cancel predicate live in [`cancelable`].

pub mod cancelable;

use crate::engine::Operation;
use crate::error::Result;
use crate::sched::{Handle, Scheduler};
use crate::time::realtime;

// ── SkipFrames ────────────────────────────────────────────────────────────

/// Runs `on_complete` after `frames` ticks (at least one).
pub fn skip_frames(
    scheduler: &Scheduler,
    frames: u32,
    on_complete: impl FnOnce() + 'static,
) -> Result<Handle> {
    Operation::builder()
        .frames(frames)
        .on_complete(on_complete)
        .start(scheduler)
}

// ── Delay ─────────────────────────────────────────────────────────────────

pub fn delay(
    scheduler: &Scheduler,
    seconds: f32,
    on_complete: impl FnOnce() + 'static,
) -> Result<Handle> {
    let scale = scheduler.time_scale().getter();
    delay_custom_time_scale(scheduler, seconds, scale, on_complete)
}

pub fn delay_realtime(
    scheduler: &Scheduler,
    seconds: f32,
    on_complete: impl FnOnce() + 'static,
) -> Result<Handle> {
    delay_custom_time_scale(scheduler, seconds, realtime(), on_complete)
}

/// Runs `on_complete` once `seconds` of time scaled by `scale` have elapsed.
///
/// `scale` is called every tick, so it can pause or slow down this one delay
/// while everything else runs at normal speed.
pub fn delay_custom_time_scale(
    scheduler: &Scheduler,
    seconds: f32,
    scale: impl FnMut() -> f32 + 'static,
    on_complete: impl FnOnce() + 'static,
) -> Result<Handle> {
    Operation::builder()
        .elapsed(seconds, scale)
        .on_complete(on_complete)
        .start(scheduler)
}

// ── WaitUntil / WaitWhile ─────────────────────────────────────────────────

pub fn wait_until(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    let scale = scheduler.time_scale().getter();
    wait_until_custom_time_scale(scheduler, condition, on_complete, scale, tick_dilation)
}

pub fn wait_until_realtime(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    wait_until_custom_time_scale(scheduler, condition, on_complete, realtime(), tick_dilation)
}

/// Checks `condition` every `tick_dilation` seconds of scaled time and runs
/// `on_complete` the first time it returns `true`.
pub fn wait_until_custom_time_scale(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    scale: impl FnMut() -> f32 + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    Operation::builder()
        .until(condition)
        .cadence_seconds(tick_dilation, scale)
        .on_complete(on_complete)
        .start(scheduler)
}

pub fn wait_while(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    wait_until(scheduler, move || !condition(), on_complete, tick_dilation)
}

pub fn wait_while_realtime(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    wait_until_realtime(scheduler, move || !condition(), on_complete, tick_dilation)
}

pub fn wait_while_custom_time_scale(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    scale: impl FnMut() -> f32 + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    wait_until_custom_time_scale(scheduler, move || !condition(), on_complete, scale, tick_dilation)
}

/// Checks `condition` every `skip_frames` ticks (every tick for 0).
pub fn wait_frames_until(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    Operation::builder()
        .until(condition)
        .cadence_frames(skip_frames)
        .on_complete(on_complete)
        .start(scheduler)
}

pub fn wait_frames_while(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_complete: impl FnOnce() + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    wait_frames_until(scheduler, move || !condition(), on_complete, skip_frames)
}

// ── RepeatUntil / RepeatWhile ─────────────────────────────────────────────

pub fn repeat_until(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    let scale = scheduler.time_scale().getter();
    repeat_until_custom_time_scale(scheduler, condition, on_tick, on_complete, scale, tick_dilation)
}

pub fn repeat_until_realtime(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    repeat_until_custom_time_scale(scheduler, condition, on_tick, on_complete, realtime(), tick_dilation)
}

/// Runs `on_tick` every `tick_dilation` seconds of scaled time until
/// `condition` returns `true`, then `on_complete`.
pub fn repeat_until_custom_time_scale(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    scale: impl FnMut() -> f32 + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    Operation::builder()
        .until(condition)
        .cadence_seconds(tick_dilation, scale)
        .on_tick(on_tick)
        .on_complete(on_complete)
        .start(scheduler)
}

pub fn repeat_while(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    repeat_until(scheduler, move || !condition(), on_tick, on_complete, tick_dilation)
}

pub fn repeat_while_realtime(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    repeat_until_realtime(scheduler, move || !condition(), on_tick, on_complete, tick_dilation)
}

pub fn repeat_while_custom_time_scale(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    scale: impl FnMut() -> f32 + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    repeat_until_custom_time_scale(
        scheduler,
        move || !condition(),
        on_tick,
        on_complete,
        scale,
        tick_dilation,
    )
}

pub fn repeat_frames_until(
    scheduler: &Scheduler,
    condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    Operation::builder()
        .until(condition)
        .cadence_frames(skip_frames)
        .on_tick(on_tick)
        .on_complete(on_complete)
        .start(scheduler)
}

pub fn repeat_frames_while(
    scheduler: &Scheduler,
    mut condition: impl FnMut() -> bool + 'static,
    on_tick: impl FnMut() + 'static,
    on_complete: impl FnOnce() + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    repeat_frames_until(scheduler, move || !condition(), on_tick, on_complete, skip_frames)
}

// ── RepeatForever ─────────────────────────────────────────────────────────

pub fn repeat_forever(
    scheduler: &Scheduler,
    on_tick: impl FnMut() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    let scale = scheduler.time_scale().getter();
    repeat_forever_custom_time_scale(scheduler, on_tick, scale, tick_dilation)
}

pub fn repeat_forever_realtime(
    scheduler: &Scheduler,
    on_tick: impl FnMut() + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    repeat_forever_custom_time_scale(scheduler, on_tick, realtime(), tick_dilation)
}

/// Runs `on_tick` every `tick_dilation` seconds of scaled time until the
/// handle is stopped or the host shuts down. Never completes.
pub fn repeat_forever_custom_time_scale(
    scheduler: &Scheduler,
    on_tick: impl FnMut() + 'static,
    scale: impl FnMut() -> f32 + 'static,
    tick_dilation: f32,
) -> Result<Handle> {
    Operation::builder()
        .forever()
        .cadence_seconds(tick_dilation, scale)
        .on_tick(on_tick)
        .start(scheduler)
}

pub fn repeat_frames_forever(
    scheduler: &Scheduler,
    on_tick: impl FnMut() + 'static,
    skip_frames: u32,
) -> Result<Handle> {
    Operation::builder()
        .forever()
        .cadence_frames(skip_frames)
        .on_tick(on_tick)
        .start(scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Outcome;
    use crate::error::WaitError;
    use crate::time::{ManualClock, TimeScale};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inc = Rc::clone(&count);
        (count, move || inc.set(inc.get() + 1))
    }

    fn flag() -> (Rc<Cell<bool>>, impl FnOnce() + 'static) {
        let done = Rc::new(Cell::new(false));
        let set = Rc::clone(&done);
        (done, move || set.set(true))
    }

    fn ticks_until_finished(sched: &Scheduler, clock: &ManualClock, handle: &Handle, max: u32) -> u32 {
        for n in 1..=max {
            sched.tick(clock);
            if handle.is_finished() {
                return n;
            }
        }
        panic!("not finished after {max} ticks");
    }

    // ── construction errors ───────────────────────────────────────────────

    #[test]
    fn negative_delay_is_rejected_before_registration() {
        let sched = Scheduler::new();
        let err = delay(&sched, -1.0, || {}).unwrap_err();
        assert!(matches!(err, WaitError::InvalidDuration { .. }));
        assert!(sched.is_empty());
    }

    #[test]
    fn negative_tick_dilation_is_rejected() {
        let sched = Scheduler::new();
        assert!(wait_until(&sched, || true, || {}, -0.5).is_err());
        assert!(repeat_forever_realtime(&sched, || {}, f32::NAN).is_err());
        assert!(sched.is_empty());
    }

    // ── delay ─────────────────────────────────────────────────────────────

    #[test]
    fn delay_follows_global_time_scale() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(0.5);
        sched.time_scale().set(0.5);

        let (done, on_complete) = flag();
        let h = delay(&sched, 1.0, on_complete).unwrap();
        assert_eq!(ticks_until_finished(&sched, &clock, &h, 10), 4);
        assert!(done.get());
    }

    #[test]
    fn delay_realtime_ignores_global_time_scale() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(0.5);
        sched.time_scale().pause();

        let h = delay_realtime(&sched, 1.0, || {}).unwrap();
        assert_eq!(ticks_until_finished(&sched, &clock, &h, 10), 2);
    }

    #[test]
    fn pausing_mid_delay_freezes_it() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(0.25);
        let h = delay(&sched, 1.0, || {}).unwrap();

        sched.tick(&clock);
        sched.tick(&clock);
        sched.time_scale().pause();
        for _ in 0..20 {
            sched.tick(&clock);
        }
        assert!(!h.is_finished());

        sched.time_scale().set(1.0);
        sched.tick(&clock);
        sched.tick(&clock);
        assert_eq!(h.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn custom_time_scale_is_independent() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(0.25);
        let fast = TimeScale::new(2.0);

        let slow_h = delay(&sched, 1.0, || {}).unwrap();
        let fast_h = delay_custom_time_scale(&sched, 1.0, fast.getter(), || {}).unwrap();

        sched.tick(&clock);
        sched.tick(&clock);
        assert!(fast_h.is_finished());
        assert!(!slow_h.is_finished());
    }

    // ── wait ──────────────────────────────────────────────────────────────

    #[test]
    fn wait_until_checks_every_dilation() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(0.1);
        let (checks, mut count) = counter();

        let h = wait_until_realtime(
            &sched,
            move || {
                count();
                false
            },
            || {},
            0.35,
        )
        .unwrap();

        for _ in 0..8 {
            sched.tick(&clock);
        }
        assert_eq!(checks.get(), 2);
        assert!(!h.is_finished());
    }

    #[test]
    fn wait_while_completes_when_condition_drops() {
        let sched = Scheduler::new();
        let clock = ManualClock::default();
        let busy = Rc::new(Cell::new(true));
        let read = Rc::clone(&busy);

        let (done, on_complete) = flag();
        let h = wait_frames_while(&sched, move || read.get(), on_complete, 0).unwrap();

        sched.tick(&clock);
        sched.tick(&clock);
        assert!(!done.get());

        busy.set(false);
        sched.tick(&clock);
        assert!(done.get());
        assert_eq!(h.outcome(), Some(Outcome::Completed));
    }

    #[test]
    fn wait_frames_until_respects_skip() {
        let sched = Scheduler::new();
        let clock = ManualClock::default();
        let h = wait_frames_until(&sched, || true, || {}, 3).unwrap();
        assert_eq!(ticks_until_finished(&sched, &clock, &h, 10), 3);
    }

    // ── repeat ────────────────────────────────────────────────────────────

    #[test]
    fn repeat_until_ticks_while_condition_false() {
        let sched = Scheduler::new();
        let clock = ManualClock::default();
        let (ticks, on_tick) = counter();
        let stop_at = Rc::clone(&ticks);

        let (done, on_complete) = flag();
        let h = repeat_frames_until(&sched, move || stop_at.get() >= 3, on_tick, on_complete, 0).unwrap();

        let n = ticks_until_finished(&sched, &clock, &h, 10);
        assert_eq!(ticks.get(), 3);
        assert_eq!(n, 4);
        assert!(done.get());
    }

    #[test]
    fn repeat_while_realtime_spaced_by_dilation() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(0.5);
        let (ticks, on_tick) = counter();

        repeat_while_realtime(&sched, || true, on_tick, || {}, 1.0).unwrap();
        for _ in 0..6 {
            sched.tick(&clock);
        }
        assert_eq!(ticks.get(), 3);
    }

    #[test]
    fn repeat_forever_never_completes() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(1.0);
        let (ticks, on_tick) = counter();

        let h = repeat_forever(&sched, on_tick, 1.0).unwrap();
        for _ in 0..50 {
            sched.tick(&clock);
        }
        assert_eq!(ticks.get(), 50);
        assert!(!h.is_finished());
    }

    #[test]
    fn repeat_forever_zero_dilation_runs_every_tick() {
        let sched = Scheduler::new();
        let clock = ManualClock::new(0.0);
        let (ticks, on_tick) = counter();

        repeat_forever_realtime(&sched, on_tick, 0.0).unwrap();
        for _ in 0..7 {
            sched.tick(&clock);
        }
        assert_eq!(ticks.get(), 7);
    }
}
