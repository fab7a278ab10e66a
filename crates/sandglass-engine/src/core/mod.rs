//! Core host-facing contracts.
//!
//! Defines the interface between the host runtime (frame loop) and the code
//! that schedules waits on it, with a consistent per-frame context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
