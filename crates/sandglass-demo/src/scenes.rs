//! Demo scenes. Each one is an `App` that starts some waits and simulates a
//! button press on a fixed frame.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use sandglass_engine::core::{App, AppControl, FrameCtx};
use sandglass_engine::ops::{self, cancelable};
use sandglass_engine::time::TimeScale;
use sandglass_engine::{Handle, Outcome, Scheduler};

/// Starts a scaled delay and logs when it fires.
#[derive(Default)]
pub struct DelayScene {
    handle: Option<Handle>,
}

impl App for DelayScene {
    fn on_start(&mut self, scheduler: &Scheduler) {
        log::info!("[delay] waiting 1.5 s");
        self.handle = ops::delay(scheduler, 1.5, || log::info!("[delay] fired"))
            .inspect_err(|e| log::error!("[delay] {e}"))
            .ok();
    }

    fn on_frame(&mut self, _ctx: &mut FrameCtx<'_>) -> AppControl {
        match self.handle.as_ref().and_then(Handle::outcome) {
            Some(_) => AppControl::Exit,
            None => AppControl::Continue,
        }
    }
}

/// A realtime delay the player cancels before it fires.
pub struct CancelButtonScene {
    press_at: u64,
    handle: Option<Handle>,
}

impl CancelButtonScene {
    pub fn new(press_at: u64) -> Self {
        Self { press_at, handle: None }
    }
}

impl App for CancelButtonScene {
    fn on_start(&mut self, scheduler: &Scheduler) {
        log::info!("[cancel] waiting 2 s of real time, cancel button at frame {}", self.press_at);
        self.handle = ops::delay_realtime(scheduler, 2.0, || log::info!("[cancel] fired"))
            .inspect_err(|e| log::error!("[cancel] {e}"))
            .ok();
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        let Some(handle) = &self.handle else {
            return AppControl::Exit;
        };
        if ctx.frame_index() == self.press_at {
            log::info!("[cancel] button pressed");
            handle.stop();
        }
        match handle.outcome() {
            Some(outcome) => {
                log::info!("[cancel] delay ended: {outcome}");
                AppControl::Exit
            }
            None => AppControl::Continue,
        }
    }
}

/// Awaits a cancelable delay from an `async` block, reacting to every kind
/// of ending. The block is polled once per frame with a no-op waker, since
/// the frame loop itself is what makes progress.
pub struct AwaitedDelayScene {
    cancel_at: u64,
    requested: Rc<Cell<bool>>,
    task: Option<Pin<Box<dyn Future<Output = Outcome>>>>,
    outcome: Option<Outcome>,
}

impl AwaitedDelayScene {
    pub fn new(cancel_at: u64) -> Self {
        Self { cancel_at, requested: Rc::default(), task: None, outcome: None }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Polls the task once. `true` once it has produced an outcome, or if
    /// there is no task.
    fn poll_task(&mut self) -> bool {
        let Some(task) = self.task.as_mut() else {
            return true;
        };
        let mut cx = Context::from_waker(Waker::noop());
        match task.as_mut().poll(&mut cx) {
            Poll::Ready(outcome) => {
                self.outcome = Some(outcome);
                self.task = None;
                true
            }
            Poll::Pending => false,
        }
    }
}

impl App for AwaitedDelayScene {
    fn on_start(&mut self, scheduler: &Scheduler) {
        log::info!("[await] waiting 3 s, cancel requested at frame {}", self.cancel_at);
        let requested = Rc::clone(&self.requested);
        let handle = match cancelable::delay_realtime(scheduler, 3.0, move || requested.get()) {
            Ok(handle) => handle,
            Err(e) => {
                log::error!("[await] {e}");
                return;
            }
        };

        self.task = Some(Box::pin(async move {
            let outcome = handle.await;
            match outcome {
                Outcome::Completed => log::info!("[await] delay completed"),
                Outcome::Canceled => log::info!("[await] delay canceled by request"),
                Outcome::CanceledBySystem => log::warn!("[await] host went away, stopping"),
            }
            outcome
        }));
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.frame_index() == self.cancel_at {
            self.requested.set(true);
        }
        if self.poll_task() {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }

    fn on_exit(&mut self, _scheduler: &Scheduler) {
        // Every pending wait has ended by now; let the task see how.
        self.poll_task();
    }
}

/// Counts every quarter second until the stop button is pressed.
pub struct RepeatForeverScene {
    stop_at: u64,
    count: Rc<Cell<u32>>,
    handle: Option<Handle>,
}

impl RepeatForeverScene {
    pub fn new(stop_at: u64) -> Self {
        Self { stop_at, count: Rc::default(), handle: None }
    }

    pub fn count(&self) -> u32 {
        self.count.get()
    }
}

impl App for RepeatForeverScene {
    fn on_start(&mut self, scheduler: &Scheduler) {
        log::info!("[repeat] counting every 0.25 s");
        let count = Rc::clone(&self.count);
        self.handle = ops::repeat_forever(
            scheduler,
            move || {
                count.set(count.get() + 1);
                log::info!("[repeat] {}", count.get());
            },
            0.25,
        )
        .inspect_err(|e| log::error!("[repeat] {e}"))
        .ok();
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.frame_index() == self.stop_at {
            if let Some(handle) = &self.handle {
                log::info!("[repeat] stop pressed after {} counts", self.count.get());
                handle.stop();
            }
        }
        match self.handle.as_ref().and_then(Handle::outcome) {
            Some(outcome) => {
                log::info!("[repeat] ended: {outcome}");
                AppControl::Exit
            }
            None => AppControl::Continue,
        }
    }
}

/// Two identical delays, one on the global scale and one on a private scale
/// running twice as fast. The private one fires first.
pub struct CustomTimeScaleScene {
    private: TimeScale,
    order: Rc<RefCell<Vec<&'static str>>>,
    handles: Vec<Handle>,
}

impl CustomTimeScaleScene {
    pub fn new(private_scale: f32) -> Self {
        Self {
            private: TimeScale::new(private_scale),
            order: Rc::default(),
            handles: Vec::new(),
        }
    }

    pub fn order(&self) -> Vec<&'static str> {
        self.order.borrow().clone()
    }
}

impl App for CustomTimeScaleScene {
    fn on_start(&mut self, scheduler: &Scheduler) {
        log::info!("[scale] two 1 s delays, private scale {}", self.private.get());

        let order = Rc::clone(&self.order);
        let global = ops::delay(scheduler, 1.0, move || {
            log::info!("[scale] global delay fired");
            order.borrow_mut().push("global");
        });

        let order = Rc::clone(&self.order);
        let private = ops::delay_custom_time_scale(scheduler, 1.0, self.private.getter(), move || {
            log::info!("[scale] private delay fired");
            order.borrow_mut().push("private");
        });

        self.handles = [global, private]
            .into_iter()
            .filter_map(|h| h.inspect_err(|e| log::error!("[scale] {e}")).ok())
            .collect();
    }

    fn on_frame(&mut self, _ctx: &mut FrameCtx<'_>) -> AppControl {
        if self.handles.iter().all(Handle::is_finished) {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }
}

/// Tears the host down while a long delay is pending.
pub struct SelfDestroyScene {
    destroy_at: u64,
    handle: Option<Handle>,
}

impl SelfDestroyScene {
    pub fn new(destroy_at: u64) -> Self {
        Self { destroy_at, handle: None }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.handle.as_ref().and_then(Handle::outcome)
    }
}

impl App for SelfDestroyScene {
    fn on_start(&mut self, scheduler: &Scheduler) {
        log::info!("[destroy] waiting 10 s, host goes away at frame {}", self.destroy_at);
        self.handle = ops::delay(scheduler, 10.0, || log::error!("[destroy] must not fire"))
            .inspect_err(|e| log::error!("[destroy] {e}"))
            .ok();
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if ctx.frame_index() == self.destroy_at {
            log::info!("[destroy] shutting down");
            ctx.shut_down();
        }
        AppControl::Continue
    }

    fn on_exit(&mut self, _scheduler: &Scheduler) {
        if let Some(outcome) = self.outcome() {
            log::info!("[destroy] pending delay ended: {outcome}");
        }
    }
}
