use crate::sched::Scheduler;
use crate::time::{FrameTime, Liveness, TimeScale};

/// Per-frame context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub time: FrameTime,
    pub scheduler: &'a Scheduler,
    pub liveness: &'a Liveness,
}

impl<'a> FrameCtx<'a> {
    pub fn frame_index(&self) -> u64 {
        self.time.frame_index
    }

    /// Seconds since the previous frame, as seen by waits this frame.
    pub fn dt(&self) -> f32 {
        self.time.dt
    }

    /// The scheduler's global time scale.
    pub fn time_scale(&self) -> &TimeScale {
        self.scheduler.time_scale()
    }

    /// Marks the host as torn down. Every live operation ends as
    /// `CanceledBySystem` on the next scheduler tick, even if the app keeps
    /// returning `Continue`.
    pub fn shut_down(&self) {
        self.liveness.shut_down();
    }
}
