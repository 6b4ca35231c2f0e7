//! Reboot Coordinator.

use std::sync::Arc;

use campanel_core::{PollOutcome, poll_until};
use campanel_ui::{Message, ToastKind};
use tracing::{info, warn};

use crate::{Panel, PanelHost};

/// Result of [`Panel::reboot_device`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebootOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    /// The device answered a health probe; the host was asked to reload.
    Online {
        /// Cache-busting reload target handed to the host.
        reload_target: String,
        /// Health probes issued.
        attempts: u32,
    },
    /// The device did not come back before the deadline.
    Unreachable {
        /// Health probes issued.
        attempts: u32,
    },
}

impl Panel {
    /// Reboots the device and waits for it to come back.
    pub fn reboot_device(&mut self, host: &mut dyn PanelHost) -> RebootOutcome {
        let was_live = self.stream.is_live() || self.pending_restart.is_armed();
        self.pending_restart.cancel();
        self.stream.stop();

        if !host.confirm(&Message::ConfirmReboot.text(self.locale)) {
            info!("reboot cancelled");
            if was_live {
                self.schedule_restart(self.timeouts.restart_delay);
            }
            return RebootOutcome::Cancelled;
        }

        let now = self.now_ms();
        self.toasts
            .push(ToastKind::Info, Message::Rebooting.text(self.locale), now);

        // The device drops the connection while rebooting; any failure is expected.
        if let Err(error) = self.link.reboot() {
            warn!(%error, "reboot request did not complete");
        }

        let link = self.link.clone();
        let clock = Arc::clone(&self.clock);
        let probe_timeout = self.timeouts.probe;
        let outcome = poll_until(clock.as_ref(), self.timeouts.reboot_poll(), |remaining| {
            link.probe(remaining.min(probe_timeout)).is_ok()
        });

        match outcome {
            PollOutcome::Ready {
                attempts,
                elapsed_ms,
            } => {
                let reload_target = format!("/?v={}", self.now_ms());
                info!(attempts, elapsed_ms, %reload_target, "device back online");
                host.reload(&reload_target);
                RebootOutcome::Online {
                    reload_target,
                    attempts,
                }
            }
            PollOutcome::DeadlineExceeded {
                attempts,
                elapsed_ms,
            } => {
                warn!(attempts, elapsed_ms, "device did not come back after reboot");
                let now = self.now_ms();
                self.toasts.push_persistent(
                    ToastKind::Error,
                    Message::RebootUnreachable.text(self.locale),
                    now,
                );
                RebootOutcome::Unreachable { attempts }
            }
        }
    }
}
