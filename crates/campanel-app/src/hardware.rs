use campanel_ui::{Message, ModalInput, ToastKind, hardware_rows};
use tracing::{debug, info, warn};

use crate::Panel;

impl Panel {
    /// Opens the hardware modal and loads the snapshot.
    ///
    /// The live preview is suspended while the modal is open and restored
    /// when it closes. Returns `false` if the modal was already open.
    pub fn open_hardware_modal(&mut self) -> bool {
        if self.modal.is_open() {
            debug!("hardware modal already open");
            return false;
        }

        self.preview_before_modal = self.stream.is_live() || self.pending_restart.is_armed();
        self.pending_restart.cancel();
        self.stream.stop();
        self.modal.open_loading();

        let result = self.link.hardware_snapshot();
        let now = self.now_ms();
        match result {
            Ok(snapshot) => {
                info!("hardware snapshot loaded");
                self.modal.show_rows(hardware_rows(&snapshot, self.locale));
                self.toasts
                    .push(ToastKind::Success, Message::HardwareLoaded.text(self.locale), now);
            }
            Err(error) => {
                let kind = error.kind();
                warn!(%error, ?kind, "hardware snapshot failed");
                let hint = Message::HardwareErrorHint { kind }.text(self.locale);
                self.modal.show_failure(
                    Message::HardwareErrorSummary { kind }.text(self.locale),
                    (!hint.is_empty()).then_some(hint),
                );
                self.toasts.push(
                    ToastKind::Error,
                    Message::HardwareFailed { kind }.text(self.locale),
                    now,
                );
            }
        }
        true
    }

    /// Closes the hardware modal.
    ///
    /// Schedules a preview restart after `restart_delay` when the preview was
    /// live before the modal opened. Returns `false` if it was not open.
    pub fn close_hardware_modal(&mut self) -> bool {
        if !self.modal.close() {
            return false;
        }

        let restore = std::mem::take(&mut self.preview_before_modal);
        if restore && !self.stream.is_live() {
            self.schedule_restart(self.timeouts.restart_delay);
        }
        debug!(restore, "hardware modal closed");
        true
    }

    /// Routes a click or key to the modal. Returns `true` if it closed.
    pub fn modal_input(&mut self, input: ModalInput) -> bool {
        self.modal.is_open() && input.dismisses() && self.close_hardware_modal()
    }
}
