use std::cell::Cell;
use std::rc::Rc;

/// Boxed scale getter, invoked once per tick by time-based waits.
pub type ScaleFn = Box<dyn FnMut() -> f32>;

/// Scale getter for waits that ignore every time scale.
pub fn realtime() -> impl FnMut() -> f32 + 'static {
    || 1.0
}

/// Calls `scale` and sanitizes the result: negative and NaN become zero,
/// infinity becomes `f32::MAX` so a zero delta stays zero.
pub(crate) fn sample(scale: &mut ScaleFn) -> f32 {
    let s = scale();
    if s > 0.0 { s.min(f32::MAX) } else { 0.0 }
}

/// Shared, adjustable time scale (1.0 = normal speed, 0.0 = paused).
///
/// Waits never hold a `TimeScale` directly; they hold the closure returned by
/// [`TimeScale::getter`], so a change made mid-wait is seen on the next tick.
#[derive(Debug, Clone)]
pub struct TimeScale(Rc<Cell<f32>>);

impl TimeScale {
    pub fn new(value: f32) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    pub fn get(&self) -> f32 {
        self.0.get()
    }

    pub fn set(&self, value: f32) {
        self.0.set(value);
    }

    pub fn pause(&self) {
        self.0.set(0.0);
    }

    /// Returns a scale getter that reads this value on every call.
    pub fn getter(&self) -> impl FnMut() -> f32 + 'static {
        let cell = Rc::clone(&self.0);
        move || cell.get()
    }
}

impl Default for TimeScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}
