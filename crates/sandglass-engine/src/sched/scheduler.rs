use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::engine::{Operation, Step};
use crate::time::{Clock, ClockReading, TimeScale};

use super::handle::{Handle, OperationId, Slot};

/// Registry of live operations, resumed once per host tick.
///
/// Cloning is cheap and every clone drives the same set of operations, so a
/// clone can be captured by callbacks that start follow-up operations.
/// Operations registered during a tick are first resumed on the next tick.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Entries stay here while they are being resumed, so queries and
    /// `shut_down` made from callbacks see them.
    live: RefCell<Vec<Rc<Entry>>>,
    incoming: RefCell<Vec<Rc<Entry>>>,
    next_id: Cell<u64>,
    ticks: Cell<u64>,
    in_tick: Cell<bool>,
    shut_down_requested: Cell<bool>,
    time_scale: TimeScale,
}

struct Entry {
    id: OperationId,
    op: RefCell<Operation>,
    slot: Rc<Slot>,
}

impl Entry {
    /// Resumes the entry for one tick, unless it already finished or is
    /// being resumed further up the stack.
    fn resume(&self, reading: ClockReading) {
        if self.slot.is_resolved() {
            return;
        }
        let Ok(mut op) = self.op.try_borrow_mut() else {
            return;
        };

        let step = if self.slot.stop_requested() && reading.alive {
            Step::Finished(op.stop())
        } else {
            op.step(reading)
        };
        drop(op);

        if let Step::Finished(outcome) = step {
            log::debug!("{} finished: {outcome}", self.id);
            self.slot.resolve(outcome);
        }
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `time_scale` as the global scale for [`crate::ops::delay`] and the
    /// other scaled operations.
    pub fn with_time_scale(time_scale: TimeScale) -> Self {
        Self {
            inner: Rc::new(Inner {
                time_scale,
                ..Inner::default()
            }),
        }
    }

    /// The global time scale. Operations hold a getter, so changes apply
    /// mid-wait.
    pub fn time_scale(&self) -> &TimeScale {
        &self.inner.time_scale
    }

    /// Registers a built operation.
    pub fn spawn(&self, op: Operation) -> Handle {
        let id = OperationId(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);

        let slot = Rc::new(Slot::default());
        if let Some(outcome) = op.outcome() {
            log::warn!("{id} registered after it already finished ({outcome})");
            slot.resolve(outcome);
        } else {
            log::debug!("{id} registered: {op:?}");
            self.inner.incoming.borrow_mut().push(Rc::new(Entry {
                id,
                op: RefCell::new(op),
                slot: Rc::clone(&slot),
            }));
        }

        Handle::new(id, slot)
    }

    /// Operations not yet finished, including ones waiting for their first
    /// tick. An operation whose terminal callback is running still counts.
    pub fn len(&self) -> usize {
        let running = |entries: &Vec<Rc<Entry>>| {
            entries.iter().filter(|e| !e.slot.is_resolved()).count()
        };
        running(&self.inner.live.borrow()) + running(&self.inner.incoming.borrow())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of ticks driven so far.
    pub fn ticks(&self) -> u64 {
        self.inner.ticks.get()
    }

    /// Resumes every live operation once with a single reading of `clock`.
    ///
    /// Returns how many operations are still running afterwards. No internal
    /// borrow is held while operation callbacks run.
    pub fn tick<C: Clock + ?Sized>(&self, clock: &C) -> usize {
        let reading = clock.reading();
        let tick = self.inner.ticks.get();
        self.inner.ticks.set(tick + 1);

        let batch = self.admit_incoming();
        log::trace!("tick {tick}: dt={} alive={} live={}", reading.dt, reading.alive, batch.len());

        let outer = !self.inner.in_tick.replace(true);
        for entry in &batch {
            let reading = if self.inner.shut_down_requested.get() {
                ClockReading::dead()
            } else {
                reading
            };
            entry.resume(reading);
        }
        if outer {
            self.inner.in_tick.set(false);
            if self.inner.shut_down_requested.take() {
                for entry in &self.admit_incoming() {
                    entry.resume(ClockReading::dead());
                }
            }
        }

        self.prune()
    }

    /// Ends every live operation as `CanceledBySystem`, e.g. when the host is
    /// torn down without a final tick. Returns how many were running.
    ///
    /// Called from inside a callback, operations not currently being resumed
    /// end immediately; the one whose callback is running ends before the
    /// current tick returns.
    pub fn shut_down(&self) -> usize {
        let before = self.len();
        if self.inner.in_tick.get() {
            self.inner.shut_down_requested.set(true);
            for entry in &self.admit_incoming() {
                entry.resume(ClockReading::dead());
            }
            self.prune();
        } else {
            self.tick(&ClockReading::dead());
        }
        before
    }

    /// Whether `id` is still registered (running, or waiting for its first tick).
    pub fn contains(&self, id: OperationId) -> bool {
        let has = |entries: &Vec<Rc<Entry>>| {
            entries.iter().any(|e| e.id == id && !e.slot.is_resolved())
        };
        has(&self.inner.live.borrow()) || has(&self.inner.incoming.borrow())
    }

    /// Moves pending registrations into the live list and returns a snapshot
    /// of it to resume without holding a borrow.
    fn admit_incoming(&self) -> Vec<Rc<Entry>> {
        let mut live = self.inner.live.borrow_mut();
        live.append(&mut self.inner.incoming.borrow_mut());
        live.clone()
    }

    fn prune(&self) -> usize {
        let mut live = self.inner.live.borrow_mut();
        live.retain(|e| !e.slot.is_resolved());
        live.len()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("live", &self.len())
            .field("ticks", &self.ticks())
            .field("time_scale", &self.inner.time_scale.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Outcome;
    use crate::time::ManualClock;

    fn frames(n: u32) -> Operation {
        Operation::builder().frames(n).build().unwrap()
    }

    #[test]
    fn operations_resume_in_registration_order() {
        let sched = Scheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for name in ["a", "b", "c"] {
            let order = Rc::clone(&order);
            let op = Operation::builder()
                .frames(0)
                .on_complete(move || order.borrow_mut().push(name))
                .build()
                .unwrap();
            sched.spawn(op);
        }

        sched.tick(&ManualClock::default());
        assert_eq!(*order.borrow(), ["a", "b", "c"]);
    }

    #[test]
    fn spawn_during_tick_starts_next_tick() {
        let sched = Scheduler::new();
        let clock = ManualClock::default();
        let follow_up: Rc<RefCell<Option<Handle>>> = Rc::default();

        let inner = sched.clone();
        let slot = Rc::clone(&follow_up);
        sched.spawn(
            Operation::builder()
                .frames(0)
                .on_complete(move || {
                    *slot.borrow_mut() = Some(inner.spawn(frames(0)));
                })
                .build()
                .unwrap(),
        );

        assert_eq!(sched.tick(&clock), 0);
        assert_eq!(sched.len(), 1);
        assert!(!follow_up.borrow().as_ref().unwrap().is_finished());

        sched.tick(&clock);
        assert!(follow_up.borrow().as_ref().unwrap().is_finished());
        assert!(sched.is_empty());
    }

    #[test]
    fn stop_takes_effect_next_tick() {
        let sched = Scheduler::new();
        let clock = ManualClock::default();
        let h = sched.spawn(frames(100));

        sched.tick(&clock);
        h.stop();
        assert!(sched.contains(h.id()));
        assert_eq!(h.outcome(), None);

        sched.tick(&clock);
        assert_eq!(h.outcome(), Some(Outcome::Canceled));
        assert!(!sched.contains(h.id()));
    }

    #[test]
    fn dead_host_wins_over_stop() {
        let sched = Scheduler::new();
        let h = sched.spawn(frames(100));
        h.stop();
        sched.tick(&ClockReading::dead());
        assert_eq!(h.outcome(), Some(Outcome::CanceledBySystem));
    }

    #[test]
    fn shut_down_cancels_everything() {
        let sched = Scheduler::new();
        let a = sched.spawn(frames(5));
        let b = sched.spawn(frames(5));
        sched.tick(&ManualClock::default());

        assert_eq!(sched.shut_down(), 2);
        assert!(sched.is_empty());
        assert_eq!(a.outcome(), Some(Outcome::CanceledBySystem));
        assert_eq!(b.outcome(), Some(Outcome::CanceledBySystem));
    }

    #[test]
    fn ids_are_unique_and_ticks_counted() {
        let sched = Scheduler::new();
        let a = sched.spawn(frames(1));
        let b = sched.spawn(frames(1));
        assert_ne!(a.id(), b.id());

        sched.tick(&ManualClock::default());
        sched.tick(&ManualClock::default());
        assert_eq!(sched.ticks(), 2);
    }

    #[test]
    fn finished_operation_resolves_on_spawn() {
        let sched = Scheduler::new();
        let mut op = frames(0);
        op.step(ClockReading::alive(0.1));

        let h = sched.spawn(op);
        assert_eq!(h.outcome(), Some(Outcome::Completed));
        assert!(sched.is_empty());
    }

    #[test]
    fn dropped_handle_keeps_operation_running() {
        let sched = Scheduler::new();
        let done = Rc::new(Cell::new(false));
        let flag = Rc::clone(&done);
        drop(sched.spawn(
            Operation::builder()
                .frames(2)
                .on_complete(move || flag.set(true))
                .build()
                .unwrap(),
        ));

        let clock = ManualClock::default();
        sched.tick(&clock);
        sched.tick(&clock);
        assert!(done.get());
    }

    #[test]
    fn callbacks_see_operations_resumed_in_the_same_tick() {
        let sched = Scheduler::new();
        let long = sched.spawn(frames(100));
        let long_id = long.id();
        let seen = Rc::new(Cell::new((0, false)));

        let inner = sched.clone();
        let out = Rc::clone(&seen);
        sched.spawn(
            Operation::builder()
                .frames(0)
                .on_complete(move || out.set((inner.len(), inner.contains(long_id))))
                .build()
                .unwrap(),
        );

        sched.tick(&ManualClock::default());
        // The long wait plus the one whose callback is running.
        assert_eq!(seen.get(), (2, true));
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn shut_down_from_completion_callback_cancels_the_rest() {
        let sched = Scheduler::new();
        let long = sched.spawn(frames(100));
        let later = sched.spawn(frames(100));

        let inner = sched.clone();
        let trigger = sched.spawn(
            Operation::builder()
                .frames(0)
                .on_complete(move || {
                    inner.shut_down();
                })
                .build()
                .unwrap(),
        );
        let after = sched.spawn(frames(100));

        sched.tick(&ManualClock::default());

        assert_eq!(trigger.outcome(), Some(Outcome::Completed));
        for h in [&long, &later, &after] {
            assert_eq!(h.outcome(), Some(Outcome::CanceledBySystem));
        }
        assert!(sched.is_empty());
    }

    #[test]
    fn shut_down_from_tick_callback_ends_its_own_operation() {
        let sched = Scheduler::new();
        let inner = sched.clone();
        let ticks = Rc::new(Cell::new(0));
        let count = Rc::clone(&ticks);

        let h = sched.spawn(
            Operation::builder()
                .forever()
                .on_tick(move || {
                    count.set(count.get() + 1);
                    inner.shut_down();
                })
                .build()
                .unwrap(),
        );
        let spawned_in_tick: Rc<RefCell<Option<Handle>>> = Rc::default();
        let slot = Rc::clone(&spawned_in_tick);
        let spawner = sched.clone();
        sched.spawn(
            Operation::builder()
                .forever()
                .on_tick(move || {
                    slot.borrow_mut().get_or_insert_with(|| spawner.spawn(frames(5)));
                })
                .build()
                .unwrap(),
        );

        sched.tick(&ManualClock::default());

        assert_eq!(h.outcome(), Some(Outcome::CanceledBySystem));
        assert_eq!(ticks.get(), 1);
        assert!(spawned_in_tick.borrow().is_none());
        assert!(sched.is_empty());
    }
}
