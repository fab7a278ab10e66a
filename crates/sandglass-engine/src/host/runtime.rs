use std::thread;
use std::time::{Duration, Instant};

use anyhow::{ensure, Context, Result};

use crate::core::{App, AppControl, FrameCtx};
use crate::sched::Scheduler;
use crate::time::{FrameClock, FrameTime, Liveness, TimeScale};

/// Frame loop configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Target wall-clock time per frame. `None` runs frames back to back.
    pub frame_interval: Option<Duration>,

    /// Stop after this many frames. Must be at least 1.
    pub max_frames: Option<u64>,

    /// Report this delta every frame instead of measured time, for
    /// reproducible runs.
    pub fixed_dt: Option<Duration>,

    /// Clamps applied to measured delta time.
    pub dt_min: Duration,
    pub dt_max: Duration,

    /// Initial value of the global time scale.
    pub time_scale: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_interval: Some(Duration::from_secs(1) / 60),
            max_frames: None,
            fixed_dt: None,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
            time_scale: 1.0,
        }
    }
}

impl RuntimeConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.dt_min <= self.dt_max,
            "dt_min ({:?}) exceeds dt_max ({:?})",
            self.dt_min,
            self.dt_max
        );
        ensure!(
            self.frame_interval != Some(Duration::ZERO),
            "frame_interval must be non-zero (use None for unpaced frames)"
        );
        ensure!(
            self.max_frames != Some(0),
            "max_frames must be at least 1 (use None for no limit)"
        );
        ensure!(
            self.time_scale.is_finite() && self.time_scale >= 0.0,
            "time_scale must be finite and non-negative (got {})",
            self.time_scale
        );
        Ok(())
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` until it exits, the host shuts down, or `max_frames` is hit.
    ///
    /// Each frame the scheduler is ticked first, then `App::on_frame` runs.
    /// On the way out liveness is cleared and one last tick ends every
    /// remaining operation as `CanceledBySystem`. Returns the app so callers
    /// can inspect its final state.
    pub fn run<A: App>(config: RuntimeConfig, mut app: A) -> Result<A> {
        config.validate().context("invalid runtime configuration")?;

        let scheduler = Scheduler::with_time_scale(TimeScale::new(config.time_scale));
        let liveness = Liveness::new();
        let mut clock = FrameClock::with_clamps(config.dt_min, config.dt_max);

        app.on_start(&scheduler);
        log::debug!("runtime started: {config:?}");

        let mut frames: u64 = 0;
        loop {
            let frame_start = Instant::now();
            let time = next_frame(&mut clock, &config);

            scheduler.tick(&time.reading(liveness.is_alive()));

            let control = {
                let mut ctx = FrameCtx {
                    time,
                    scheduler: &scheduler,
                    liveness: &liveness,
                };
                app.on_frame(&mut ctx)
            };

            frames += 1;

            if control == AppControl::Exit {
                log::debug!("app requested exit at frame {}", time.frame_index);
                break;
            }
            if !liveness.is_alive() {
                log::debug!("host shut down at frame {}", time.frame_index);
                break;
            }
            if config.max_frames.is_some_and(|max| frames >= max) {
                log::debug!("frame limit reached");
                break;
            }

            if let Some(interval) = config.frame_interval {
                let spent = frame_start.elapsed();
                if spent < interval {
                    thread::sleep(interval - spent);
                }
            }
        }

        liveness.shut_down();
        let canceled = scheduler.shut_down();
        if canceled > 0 {
            log::info!("{canceled} operation(s) canceled by shutdown");
        }

        app.on_exit(&scheduler);
        log::debug!("runtime stopped after {frames} frames");

        Ok(app)
    }
}

fn next_frame(clock: &mut FrameClock, config: &RuntimeConfig) -> FrameTime {
    let mut time = clock.tick();
    if let Some(fixed) = config.fixed_dt {
        time.dt = fixed.as_secs_f32();
    }
    time
}
