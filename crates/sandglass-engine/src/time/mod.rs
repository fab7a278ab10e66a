//! Time subsystem.
//!
//! Everything the wait engine reads from its host, kept independent of any
//! particular host loop:
//! - `Clock` / `ClockReading`: delta time and liveness, read once per tick
//! - `TimeScale`: a shared scale value (pause, slow motion) handed out as closures
//! - `Liveness`: the host's "still running" flag
//! - `FrameClock`: monotonic frame timing for real-time hosts

mod clock;
mod frame_clock;
mod liveness;
mod scale;

pub use clock::{Clock, ClockReading, ManualClock};
pub use frame_clock::{FrameClock, FrameTime};
pub use liveness::Liveness;
pub use scale::{realtime, ScaleFn, TimeScale};
pub(crate) use scale::sample;
