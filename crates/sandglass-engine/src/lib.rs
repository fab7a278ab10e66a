//! Sandglass engine crate.
//!
//! Cooperative wait primitives (delays, frame skips, conditional waits and
//! repeats) that a host advances once per tick, plus a small headless host
//! runtime that plays the tick source for tools and demos.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`time`] | `Clock`, `ClockReading`, `ManualClock`, `FrameClock`, `TimeScale`, `Liveness` |
//! | [`engine`] | `Operation` state machine, `OperationBuilder`, `Outcome` |
//! | [`sched`] | `Scheduler` (per-tick driver) and owner `Handle`s |
//! | [`ops`] | Named wait/repeat operations |
//! | [`core`] / [`host`] | `App` contract and the `Runtime` frame loop |
//!
//! # Quick start
//!
//! ```rust
//! use sandglass_engine::ops;
//! use sandglass_engine::time::ManualClock;
//! use sandglass_engine::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let clock = ManualClock::new(0.5);
//!
//! let handle = ops::delay_realtime(&scheduler, 1.0, || println!("done")).unwrap();
//! scheduler.tick(&clock);
//! scheduler.tick(&clock);
//! assert!(handle.outcome().is_some_and(|o| o.is_completed()));
//! ```

pub mod core;
pub mod engine;
pub mod error;
pub mod host;
pub mod ops;
pub mod sched;
pub mod time;

pub mod logging;

pub use engine::{Operation, OperationBuilder, Outcome, Step};
pub use error::WaitError;
pub use sched::{Handle, OperationId, Scheduler};
