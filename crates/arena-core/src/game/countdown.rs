use std::time::Duration;

use crate::environment::EnvironmentId;
use crate::scheduler::{FiredTimer, Scheduler, TimerHandle, TimerPurpose, TimerTask};

/// Number of visible ticks before a game starts.
pub const COUNTDOWN_LENGTH: u32 = 10;

/// Spacing between two countdown ticks.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// The single pending countdown timer of a game.
///
/// At most one countdown timer exists per game. Arming replaces (and
/// cancels) the previous one; a fired timer is only accepted if it is the
/// one currently armed.
#[derive(Debug, Default)]
pub struct Countdown {
    handle: Option<TimerHandle>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.handle
    }

    /// Schedules the tick that will display `remaining`.
    pub fn arm(&mut self, scheduler: &dyn Scheduler, environment: &EnvironmentId, remaining: u32) {
        self.cancel(scheduler);
        let task = TimerTask {
            environment: environment.clone(),
            purpose: TimerPurpose::Countdown { remaining },
        };
        self.handle = Some(scheduler.schedule(task, COUNTDOWN_TICK));
    }

    /// Cancels the pending tick. Returns whether one was pending.
    pub fn cancel(&mut self, scheduler: &dyn Scheduler) -> bool {
        match self.handle.take() {
            Some(handle) => {
                scheduler.cancel(handle);
                true
            }
            None => false,
        }
    }

    /// Accepts a fired timer if it is the armed countdown tick.
    ///
    /// Returns the count to display; stale or foreign timers yield `None`.
    pub fn accept(&mut self, fired: &FiredTimer) -> Option<u32> {
        let TimerPurpose::Countdown { remaining } = fired.task.purpose else {
            return None;
        };
        if self.handle != Some(fired.handle) {
            return None;
        }
        self.handle = None;
        Some(remaining)
    }
}
