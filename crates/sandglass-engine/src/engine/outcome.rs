use std::fmt;

/// Terminal classification of a finished operation.
///
/// Exactly one is produced per operation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The termination policy was satisfied.
    Completed,
    /// The cancel predicate fired, or the owner stopped the operation.
    Canceled,
    /// The host stopped running mid-wait. Environment state should not be
    /// trusted after this; no callback runs.
    CanceledBySystem,
}

impl Outcome {
    pub fn is_completed(self) -> bool {
        self == Outcome::Completed
    }

    pub fn is_canceled(self) -> bool {
        self == Outcome::Canceled
    }

    pub fn is_canceled_by_system(self) -> bool {
        self == Outcome::CanceledBySystem
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Completed => "completed",
            Outcome::Canceled => "canceled",
            Outcome::CanceledBySystem => "canceled by system",
        };
        f.write_str(s)
    }
}
