//! One-shot timers evaluated against an explicit `now_ms`.

use std::time::Duration;

/// One-shot timer used for watchdogs and delayed actions.
///
/// The timer never fires by itself; owners call [`Timer::fire_if_due`] from
/// their tick path, and cancel it on the success path that makes it moot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    due_ms: Option<u64>,
}

impl Timer {
    /// Creates a disarmed timer.
    pub const fn idle() -> Self {
        Self { due_ms: None }
    }

    /// Arms (or re-arms) the timer to fire `delay` after `now_ms`.
    pub fn arm(&mut self, now_ms: u64, delay: Duration) {
        self.due_ms = Some(now_ms.saturating_add(delay.as_millis() as u64));
    }

    /// Disarms the timer.
    pub fn cancel(&mut self) {
        self.due_ms = None;
    }

    /// Returns `true` while the timer is armed.
    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    /// Returns the absolute due time, if armed.
    pub fn due_ms(&self) -> Option<u64> {
        self.due_ms
    }

    /// Returns `true` exactly once when `now_ms` has reached the due time.
    ///
    /// Firing disarms the timer.
    pub fn fire_if_due(&mut self, now_ms: u64) -> bool {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}
