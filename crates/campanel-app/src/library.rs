//! File list, storage summary, delete and stored-photo preview.

use std::time::Duration;

use campanel_core::ErrorKind;
use campanel_link::DeleteOutcome;
use campanel_ui::{
    FileListState, Message, PreviewSurface, StorageView, ToastKind, file_list_view, storage_view,
};
use tracing::{debug, info, warn};

use crate::{Panel, PanelHost};

/// Result of [`Panel::delete_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteReport {
    /// The user declined; nothing was sent.
    Cancelled,
    /// The file was removed.
    Deleted,
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
}

/// Result of [`Panel::preview_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoReport {
    /// The photo is shown.
    Shown {
        /// Image size.
        bytes: usize,
        /// Fetch duration.
        elapsed_ms: u64,
    },
    /// The photo could not be loaded; the surface offers a retry.
    Failed {
        /// Failure class.
        kind: ErrorKind,
    },
}

impl Panel {
    /// Fetches the file list. A failure raises a toast and marks the list
    /// failed; it is not retried.
    pub fn refresh_file_list(&mut self) {
        match self.link.list_files() {
            Ok(listing) => {
                debug!(files = listing.files.len(), "file list refreshed");
                self.files = FileListState::Loaded(file_list_view(&listing, self.locale));
            }
            Err(error) => {
                warn!(%error, "file list refresh failed");
                self.files = FileListState::Failed;
                let now = self.now_ms();
                self.toasts
                    .push(ToastKind::Error, Message::FileListFailed.text(self.locale), now);
            }
        }
    }

    /// Fetches the storage summary. A failure shows `Error` values.
    pub fn refresh_storage(&mut self) {
        self.storage = Some(match self.link.storage_summary() {
            Ok(summary) => storage_view(&summary),
            Err(error) => {
                warn!(%error, "storage summary refresh failed");
                StorageView::failed()
            }
        });
    }

    /// Deletes a stored photo after confirmation.
    pub fn delete_file(&mut self, name: &str, host: &mut dyn PanelHost) -> DeleteReport {
        let prompt = Message::ConfirmDelete {
            filename: name.to_string(),
        }
        .text(self.locale);
        if !host.confirm(&prompt) {
            return DeleteReport::Cancelled;
        }

        let result = self.link.delete_file(name);
        let now = self.now_ms();
        match result {
            Ok(DeleteOutcome::Deleted) => {
                info!(name, "file deleted");
                self.toasts.push(
                    ToastKind::Success,
                    Message::FileDeleted {
                        filename: name.to_string(),
                    }
                    .text(self.locale),
                    now,
                );
                self.refresh_file_list();
                self.refresh_storage();
                if self.stream.surface().shows_photo(name) {
                    self.stream.show_still(PreviewSurface::Idle);
                }
                DeleteReport::Deleted
            }
            Ok(DeleteOutcome::Rejected { message }) => {
                warn!(name, %message, "device rejected delete");
                self.toasts.push(
                    ToastKind::Error,
                    Message::DeleteRejected {
                        message: message.clone(),
                    }
                    .text(self.locale),
                    now,
                );
                DeleteReport::Rejected { message }
            }
            Err(error) => {
                warn!(name, %error, "delete request failed");
                self.toasts.push(
                    ToastKind::Error,
                    Message::DeleteFailed {
                        detail: error.to_string(),
                    }
                    .text(self.locale),
                    now,
                );
                DeleteReport::Failed { kind: error.kind() }
            }
        }
    }

    /// Shows a stored photo in the preview area, stopping the live preview.
    pub fn preview_file(&mut self, name: &str) -> PhotoReport {
        self.pending_restart.cancel();
        self.stream.stop();
        self.stream.show_still(PreviewSurface::PhotoLoading {
            name: name.to_string(),
        });

        let started = self.now_ms();
        let result = self.link.photo(name);
        let elapsed_ms = self.now_ms().saturating_sub(started);
        if Duration::from_millis(elapsed_ms) > self.timeouts.photo_slow_notice {
            warn!(name, elapsed_ms, "stored photo loaded slowly");
        }

        match result {
            Ok(data) => {
                let bytes = data.len();
                debug!(name, bytes, elapsed_ms, "stored photo loaded");
                self.stream.show_still(PreviewSurface::Photo {
                    name: name.to_string(),
                    data,
                });
                PhotoReport::Shown { bytes, elapsed_ms }
            }
            Err(error) => {
                warn!(name, %error, "stored photo failed to load");
                self.stream.show_still(PreviewSurface::PhotoFailed {
                    name: name.to_string(),
                });
                PhotoReport::Failed { kind: error.kind() }
            }
        }
    }
}
