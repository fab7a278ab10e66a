//! Headless host runtime.
//!
//! Owns the frame loop: a `FrameClock` for delta time, a `Liveness` flag and a
//! `Scheduler`, wired to an [`crate::core::App`]. This is the tick source and
//! liveness source the wait engine expects from its host.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
