use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{FiredTimer, Scheduler, TimerHandle, TimerTask};

#[derive(Default)]
struct Queue {
    now: Duration,
    next_id: u64,
    // Keyed by (deadline, id) so equal deadlines fire in scheduling order.
    timers: BTreeMap<(Duration, u64), TimerTask>,
    deadlines: HashMap<u64, Duration>,
}

/// A scheduler driven by an explicit virtual clock.
///
/// Time only moves when `advance` is called, which makes the scheduler
/// suitable both for tick-based hosts (advance by one tick per frame) and
/// for deterministic tests.
#[derive(Default)]
pub struct TickScheduler {
    queue: Mutex<Queue>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self) -> MutexGuard<'_, Queue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves the virtual clock forward.
    pub fn advance(&self, elapsed: Duration) {
        let mut queue = self.queue();
        queue.now += elapsed;
    }

    /// Current virtual time since creation.
    pub fn now(&self) -> Duration {
        self.queue().now
    }

    /// Number of timers that are scheduled and not canceled.
    pub fn pending_count(&self) -> usize {
        self.queue().timers.len()
    }
}

impl Scheduler for TickScheduler {
    fn schedule(&self, task: TimerTask, delay: Duration) -> TimerHandle {
        let mut queue = self.queue();
        let id = queue.next_id;
        queue.next_id += 1;
        let deadline = queue.now + delay;
        queue.timers.insert((deadline, id), task);
        queue.deadlines.insert(id, deadline);
        TimerHandle::new(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let mut queue = self.queue();
        if let Some(deadline) = queue.deadlines.remove(&handle.id()) {
            queue.timers.remove(&(deadline, handle.id()));
        }
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue().deadlines.contains_key(&handle.id())
    }

    fn watermark(&self) -> TimerHandle {
        TimerHandle::new(self.queue().next_id)
    }

    fn pop_due_before(&self, bound: TimerHandle) -> Option<FiredTimer> {
        let mut queue = self.queue();
        let (deadline, id) = queue
            .timers
            .range(..=(queue.now, u64::MAX))
            .map(|(&key, _)| key)
            .find(|&(_, id)| id < bound.id())?;
        let task = queue.timers.remove(&(deadline, id))?;
        queue.deadlines.remove(&id);
        Some(FiredTimer {
            handle: TimerHandle::new(id),
            task,
        })
    }
}
