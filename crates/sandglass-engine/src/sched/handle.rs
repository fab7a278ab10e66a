use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use crate::engine::Outcome;

/// Scheduler-assigned operation identifier, unique per scheduler.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct OperationId(pub(crate) u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// State shared between a handle and the scheduler entry it points at.
#[derive(Default)]
pub(crate) struct Slot {
    stop_requested: Cell<bool>,
    outcome: Cell<Option<Outcome>>,
    waker: RefCell<Option<Waker>>,
}

impl Slot {
    pub(crate) fn stop_requested(&self) -> bool {
        self.stop_requested.get()
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.outcome.get().is_some()
    }

    pub(crate) fn resolve(&self, outcome: Outcome) {
        self.outcome.set(Some(outcome));
        let waker = self.waker.borrow_mut().take();
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

/// Owner reference to a running operation.
///
/// Not clonable: whoever holds the handle is the only party that may stop the
/// operation. Dropping the handle leaves the operation running.
///
/// A handle is also a `Future` resolving to the operation's [`Outcome`], for
/// hosts that drive async code from the same tick loop.
pub struct Handle {
    id: OperationId,
    slot: Rc<Slot>,
}

impl Handle {
    pub(crate) fn new(id: OperationId, slot: Rc<Slot>) -> Self {
        Self { id, slot }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    /// Requests a hard stop.
    ///
    /// Takes effect on the scheduler's next tick: the operation then ends as
    /// `Canceled` without running any callback, unless the host is no longer
    /// alive (`CanceledBySystem`) or it already finished. A callback that is
    /// already running is not interrupted.
    pub fn stop(&self) {
        if self.slot.outcome.get().is_none() {
            self.slot.stop_requested.set(true);
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.slot.outcome.get()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id)
            .field("outcome", &self.outcome())
            .finish()
    }
}

impl Future for Handle {
    type Output = Outcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        match self.slot.outcome.get() {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                *self.slot.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}
