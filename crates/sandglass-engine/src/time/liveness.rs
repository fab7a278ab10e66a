use std::cell::Cell;
use std::rc::Rc;

/// Host liveness flag.
///
/// Cloned handles share one flag: the host flips it when it leaves its active
/// execution mode and every reader sees the change on its next tick. The wait
/// engine never infers liveness on its own.
#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    /// A flag that starts alive.
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn set_alive(&self, alive: bool) {
        self.0.set(alive);
    }

    pub fn shut_down(&self) {
        self.0.set(false);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}
