use std::cell::Cell;

/// Source of the two raw signals every wait consumes each tick.
///
/// Implementations are purely observational; reading a clock never advances it.
pub trait Clock {
    /// Real time elapsed since the previous tick, in seconds.
    fn delta_time(&self) -> f32;

    /// Whether the host environment is still executing.
    fn is_alive(&self) -> bool;

    /// Snapshot of both signals for the current tick.
    fn reading(&self) -> ClockReading {
        ClockReading::new(self.delta_time(), self.is_alive())
    }
}

/// Per-tick clock snapshot. Never stored past the tick it was taken for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClockReading {
    /// Seconds since the previous tick; never negative.
    ///
    /// Built through [`ClockReading::new`] this is also finite.
    pub dt: f32,

    /// `false` once the host has torn down.
    pub alive: bool,
}

impl ClockReading {
    /// Negative or NaN deltas are read as zero, infinite ones as `f32::MAX`.
    pub fn new(dt: f32, alive: bool) -> Self {
        Self {
            dt: dt.max(0.0).min(f32::MAX),
            alive,
        }
    }

    pub fn alive(dt: f32) -> Self {
        Self::new(dt, true)
    }

    pub fn dead() -> Self {
        Self::new(0.0, false)
    }
}

impl Clock for ClockReading {
    fn delta_time(&self) -> f32 {
        self.dt
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn reading(&self) -> ClockReading {
        *self
    }
}

/// Hand-driven clock for tests and hosts that step time themselves.
///
/// Interior mutability lets the clock be shared with closures that flip
/// liveness or change the frame delta mid-run.
#[derive(Debug)]
pub struct ManualClock {
    dt: Cell<f32>,
    alive: Cell<bool>,
}

impl ManualClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt: Cell::new(dt),
            alive: Cell::new(true),
        }
    }

    pub fn set_dt(&self, dt: f32) {
        self.dt.set(dt);
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.set(alive);
    }

    /// Reports the host as torn down from now on.
    pub fn shut_down(&self) {
        self.alive.set(false);
    }
}

impl Default for ManualClock {
    /// 60 Hz, alive.
    fn default() -> Self {
        Self::new(1.0 / 60.0)
    }
}

impl Clock for ManualClock {
    fn delta_time(&self) -> f32 {
        self.dt.get()
    }

    fn is_alive(&self) -> bool {
        self.alive.get()
    }
}
