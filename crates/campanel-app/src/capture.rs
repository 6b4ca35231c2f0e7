//! Capture Coordinator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use campanel_core::ErrorKind;
use campanel_link::{CaptureOutcome, LinkError};
use campanel_ui::{Message, ToastKind};
use tracing::{info, warn};

use crate::Panel;

/// In-flight flag of the capture flow.
#[derive(Debug, Clone, Default)]
pub struct CaptureLock {
    held: Arc<AtomicBool>,
}

impl CaptureLock {
    /// Creates a released lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock, or returns `None` while it is held.
    pub fn try_acquire(&self) -> Option<CaptureLockGuard> {
        self.held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| CaptureLockGuard {
                held: Arc::clone(&self.held),
            })
    }

    /// Returns `true` while held.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    /// Clears the lock. Returns `true` if it was held.
    pub fn force_release(&self) -> bool {
        self.held.swap(false, Ordering::SeqCst)
    }
}

/// Releases the [`CaptureLock`] when dropped.
#[derive(Debug)]
pub struct CaptureLockGuard {
    held: Arc<AtomicBool>,
}

impl Drop for CaptureLockGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::SeqCst);
    }
}

/// Result of one capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureResult {
    /// Photo stored under `filename`.
    Saved {
        /// Stored file name.
        filename: String,
    },
    /// Device refused; `message` is shown verbatim.
    Rejected {
        /// Device message.
        message: String,
    },
    /// Request failed in transport.
    Failed {
        /// Failure class.
        kind: ErrorKind,
    },
    /// Another capture holds the lock; nothing was sent.
    Busy,
}

/// Summary of [`Panel::capture_photo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    /// Capture result.
    pub outcome: CaptureResult,
    /// Whether the live preview was restarted afterwards.
    pub resumed: bool,
}

impl Panel {
    /// Captures a still photo.
    ///
    /// A live preview is stopped first, the device is told to leave its
    /// streaming loop, and the preview is restarted afterwards. The device
    /// cannot stream and capture at the same time.
    pub fn capture_photo(&mut self) -> CaptureReport {
        if self.capture_lock.is_held() {
            warn!("capture ignored; another capture is in flight");
            return CaptureReport {
                outcome: CaptureResult::Busy,
                resumed: false,
            };
        }

        // A pending preview restart counts as live; the capture resumes it.
        let was_live = self.stream.is_live() || self.pending_restart.is_armed();
        self.pending_restart.cancel();
        if self.stream.is_live() {
            self.stream.stop();
            if let Err(error) = self.link.stop_stream() {
                warn!(%error, "stream stop notification failed");
            }
            self.clock.sleep(self.timeouts.stream_release_delay);
        }

        let outcome = match self.capture_lock.try_acquire() {
            Some(_guard) => {
                let now = self.now_ms();
                self.toasts
                    .push(ToastKind::Info, Message::Capturing.text(self.locale), now);
                let result = self.link.capture();
                self.apply_capture_result(result)
            }
            None => CaptureResult::Busy,
        };

        let now = self.now_ms();
        self.capture_reset
            .arm(now, self.timeouts.capture_forced_reset);

        let resumed = was_live && self.stream.start(now);
        CaptureReport { outcome, resumed }
    }

    fn apply_capture_result(&mut self, result: Result<CaptureOutcome, LinkError>) -> CaptureResult {
        let now = self.now_ms();
        match result {
            Ok(CaptureOutcome::Saved { filename }) => {
                info!(%filename, "photo captured");
                self.toasts.push(
                    ToastKind::Success,
                    Message::CaptureSaved {
                        filename: filename.clone(),
                    }
                    .text(self.locale),
                    now,
                );
                self.refresh_file_list();
                self.refresh_storage();
                CaptureResult::Saved { filename }
            }
            Ok(CaptureOutcome::Rejected { message }) => {
                warn!(%message, "device rejected capture");
                self.toasts.push(
                    ToastKind::Error,
                    Message::CaptureRejected {
                        message: message.clone(),
                    }
                    .text(self.locale),
                    now,
                );
                CaptureResult::Rejected { message }
            }
            Err(error) => {
                let kind = error.kind();
                warn!(%error, ?kind, "capture request failed");
                self.toasts.push(
                    ToastKind::Error,
                    Message::CaptureFailed { kind }.text(self.locale),
                    now,
                );
                CaptureResult::Failed { kind }
            }
        }
    }
}
