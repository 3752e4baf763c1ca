//! Delayed, cancelable callbacks.
//!
//! The scheduler does not store closures. A scheduled timer carries a
//! `TimerTask` naming the environment it belongs to and what it is for; the
//! owner of the games pops due timers one by one and routes each to the
//! game bound to that environment.

mod tick;

pub use tick::TickScheduler;

use crate::environment::EnvironmentId;
use std::time::Duration;

/// Handle of a scheduled timer. Unique per scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Countdown tick; `remaining` is the count to display when it fires.
    Countdown { remaining: u32 },
    /// Timer owned by the game type, identified by a kind-chosen tag.
    Game { tag: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerTask {
    pub environment: EnvironmentId,
    pub purpose: TimerPurpose,
}

/// A timer that came due and was not canceled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub task: TimerTask,
}

/// Poll-based delayed-callback scheduler.
///
/// # Implementation Notes
///
/// - `cancel` must be idempotent and take effect immediately: a canceled
///   timer is never returned by `pop_due`.
/// - `pop_due` returns a single timer so that cancellations performed while
///   handling it are observed before the next one is delivered.
/// - Handles increase monotonically: a timer scheduled after `watermark`
///   was read gets a handle at or above it.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, task: TimerTask, delay: Duration) -> TimerHandle;

    fn cancel(&self, handle: TimerHandle);

    fn is_pending(&self, handle: TimerHandle) -> bool;

    /// The handle the next scheduled timer will get.
    fn watermark(&self) -> TimerHandle;

    /// Removes and returns the earliest due timer whose handle is below
    /// `bound`, if any.
    fn pop_due_before(&self, bound: TimerHandle) -> Option<FiredTimer>;

    /// Removes and returns the earliest due timer, if any.
    fn pop_due(&self) -> Option<FiredTimer> {
        self.pop_due_before(TimerHandle::new(u64::MAX))
    }
}
