//! Fixed-interval polling bounded by an overall deadline.

use std::time::Duration;

use crate::Clock;

/// Interval and deadline for [`poll_until`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Pause between two probes.
    pub interval: Duration,
    /// Overall budget measured from the first probe.
    pub deadline: Duration,
}

/// Result of a [`poll_until`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A probe succeeded.
    Ready {
        /// Number of probes issued, including the successful one.
        attempts: u32,
        /// Time spent polling.
        elapsed_ms: u64,
    },
    /// The deadline elapsed without a successful probe.
    DeadlineExceeded {
        /// Number of probes issued.
        attempts: u32,
        /// Time spent polling.
        elapsed_ms: u64,
    },
}

impl PollOutcome {
    /// Returns `true` for [`PollOutcome::Ready`].
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    /// Returns the number of probes issued.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Ready { attempts, .. } | Self::DeadlineExceeded { attempts, .. } => *attempts,
        }
    }
}

/// Runs `probe` every `policy.interval` until it returns `true` or the
/// deadline elapses.
///
/// `probe` receives the remaining budget so it can clamp its own timeout.
/// Pauses are clamped to the remaining budget, so a probe that honours the
/// budget makes the loop end exactly at the deadline and never after it.
pub fn poll_until<F>(clock: &dyn Clock, policy: PollPolicy, mut probe: F) -> PollOutcome
where
    F: FnMut(Duration) -> bool,
{
    let start = clock.now_ms();
    let deadline_ms = policy.deadline.as_millis() as u64;
    let interval_ms = policy.interval.as_millis() as u64;
    let mut attempts = 0u32;

    loop {
        let elapsed = clock.now_ms().saturating_sub(start);
        if elapsed >= deadline_ms {
            return PollOutcome::DeadlineExceeded {
                attempts,
                elapsed_ms: elapsed,
            };
        }

        attempts += 1;
        if probe(Duration::from_millis(deadline_ms - elapsed)) {
            return PollOutcome::Ready {
                attempts,
                elapsed_ms: clock.now_ms().saturating_sub(start),
            };
        }

        let elapsed = clock.now_ms().saturating_sub(start);
        if elapsed >= deadline_ms {
            continue;
        }
        clock.sleep(Duration::from_millis(interval_ms.min(deadline_ms - elapsed)));
    }
}
