//! Construction errors for wait operations.
//!
//! Runtime endings (`Canceled`, `CanceledBySystem`) are not errors; they are
//! reported through [`crate::Outcome`].

use thiserror::Error;

/// An operation could not be built from the given arguments.
///
/// Always returned before anything is registered with a scheduler, so a
/// failed call never leaves a half-started operation behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaitError {
    /// A delay or tick dilation was negative, NaN or infinite.
    #[error("{what} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration {
        /// Which argument was rejected.
        what: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The builder was started without a termination policy.
    #[error("operation has no termination policy")]
    MissingPolicy,

    /// A repeat-forever operation had nothing to repeat.
    #[error("repeat-forever operation requires a tick callback")]
    MissingTickCallback,
}

pub type Result<T> = std::result::Result<T, WaitError>;

/// Accepts `value` as a duration in seconds, or names it in the error.
pub(crate) fn check_seconds(what: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(WaitError::InvalidDuration { what, value })
    }
}
