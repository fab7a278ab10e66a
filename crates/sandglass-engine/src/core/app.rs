use crate::sched::Scheduler;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::host::Runtime`].
pub trait App {
    /// Called once before the first frame.
    fn on_start(&mut self, scheduler: &Scheduler) {
        let _ = scheduler;
    }

    /// Called once per frame, after the scheduler has resumed every live
    /// operation for that frame. Operations started here are first resumed
    /// on the next frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;

    /// Called once after the final scheduler tick, when every operation that
    /// was still running has ended as `CanceledBySystem`.
    fn on_exit(&mut self, scheduler: &Scheduler) {
        let _ = scheduler;
    }
}
