#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cancellable scheduled tasks driven by a simulated clock.
//!
//! Demo state machines never read the wall clock. The host feeds elapsed time
//! through [`Scheduler::advance`], and the owner then drains due tasks one at
//! a time with [`Scheduler::pop_due`]. Draining one task at a time lets a task
//! body cancel tasks that would otherwise fire later in the same batch.

use std::{cell::Cell, collections::BTreeMap, rc::Rc, time::Duration};

use tracing::trace;

/// Identifier allocated to each scheduled task in submission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Handle returned when a task is scheduled.
///
/// Cancelling through the handle takes effect the next time the scheduler
/// looks for due work, so a cancelled task never fires again.
#[derive(Clone, Debug)]
pub struct TaskHandle {
    id: TaskId,
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    /// Identifier of the scheduled task.
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Prevents the task from firing again.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Reports whether the task was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[derive(Debug)]
struct Task<T> {
    payload: T,
    due: Duration,
    period: Option<Duration>,
    cancelled: Rc<Cell<bool>>,
}

/// Deterministic timer wheel keyed by task identifier.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    horizon: Duration,
    next_id: u64,
    tasks: BTreeMap<TaskId, Task<T>>,
}

impl<T: Clone> Scheduler<T> {
    /// Creates an empty scheduler with its clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            next_id: 0,
            tasks: BTreeMap::new(),
        }
    }

    /// Current simulated time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of tasks that have not been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks
            .values()
            .filter(|task| !task.cancelled.get())
            .count()
    }

    /// Schedules `payload` to fire every `period`, first one period from now.
    ///
    /// A zero period is widened to one nanosecond so a single `advance` can
    /// never fire the task forever.
    pub fn schedule_repeating(&mut self, period: Duration, payload: T) -> TaskHandle {
        let period = period.max(Duration::from_nanos(1));
        self.insert(self.now.saturating_add(period), Some(period), payload)
    }

    /// Schedules `payload` to fire once after `delay`.
    pub fn schedule_once(&mut self, delay: Duration, payload: T) -> TaskHandle {
        self.insert(self.now.saturating_add(delay), None, payload)
    }

    /// Cancels every outstanding task.
    pub fn cancel_all(&mut self) {
        for task in self.tasks.values() {
            task.cancelled.set(true);
        }
        self.tasks.clear();
    }

    /// Moves the horizon `dt` past the current time.
    ///
    /// Tasks due before the horizon are released by [`Scheduler::pop_due`].
    pub fn advance(&mut self, dt: Duration) {
        self.horizon = self.horizon.max(self.now).saturating_add(dt);
    }

    /// Releases the next task due at or before the horizon.
    ///
    /// Tasks fire in due-time order, ties broken by submission order. The
    /// clock moves to the due time of the released task, and to the horizon
    /// once nothing else is due.
    pub fn pop_due(&mut self) -> Option<T> {
        self.tasks.retain(|_, task| !task.cancelled.get());

        let next = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= self.horizon)
            .min_by_key(|(id, task)| (task.due, **id))
            .map(|(id, _)| *id);

        let Some(id) = next else {
            self.now = self.now.max(self.horizon);
            return None;
        };

        let task = self.tasks.get_mut(&id)?;
        self.now = task.due;
        let payload = task.payload.clone();
        let at_ms = u64::try_from(self.now.as_millis()).unwrap_or(u64::MAX);
        trace!(task = id.get(), at_ms, "task fired");

        match task.period {
            Some(period) => task.due = task.due.saturating_add(period),
            None => {
                let _ = self.tasks.remove(&id);
            }
        }

        Some(payload)
    }

    fn insert(&mut self, due: Duration, period: Option<Duration>, payload: T) -> TaskHandle {
        let id = TaskId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let cancelled = Rc::new(Cell::new(false));
        let _ = self.tasks.insert(
            id,
            Task {
                payload,
                due,
                period,
                cancelled: Rc::clone(&cancelled),
            },
        );
        TaskHandle { id, cancelled }
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
