#![warn(missing_docs)]
//! # campanel-ui
//!
//! ## Purpose
//! Defines the view model of the camera panel: what the user sees, kept
//! independent of how a host draws it.
//!
//! ## Responsibilities
//! - Hold toast notifications with expiry.
//! - Model the hardware information modal and its dismissal inputs.
//! - Model the preview surface placeholders.
//! - Render device replies (hardware snapshot, storage summary, file list)
//!   into display rows.
//! - Provide the localized message catalog.
//!
//! ## Data flow
//! Coordinators mutate the state types here; hosts read them back and draw
//! them. Renderers are pure functions from `campanel_core` types to rows.
//!
//! ## Ownership and lifetimes
//! All view values own their strings and frame bytes so a host can hold a
//! snapshot without borrowing the panel.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Failed loads are
//! variants of the view state, not `Result`s.

mod messages;
mod modal;
mod notify;
mod preview;
mod render;

pub use messages::{DisableReason, Locale, Message};
pub use modal::{HardwareModal, InfoRow, ModalContent, ModalInput};
pub use notify::{Notifications, TOAST_TTL, Toast, ToastKind};
pub use preview::PreviewSurface;
pub use render::{
    FileListState, FileListView, FileRow, STORAGE_ERROR_TEXT, StorageView, UsageLevel,
    file_list_view, format_bytes, format_file_size, hardware_rows, storage_view,
};

/// Derived state of the capture control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureControl {
    /// Whether the control accepts input.
    pub enabled: bool,
    /// Why the control is disabled, when it is.
    pub disabled_reason: Option<DisableReason>,
}

impl CaptureControl {
    /// Returns the control label.
    pub fn label(&self, locale: Locale) -> String {
        if self.disabled_reason == Some(DisableReason::Capturing) {
            Message::CapturingLabel.text(locale)
        } else {
            Message::CaptureLabel.text(locale)
        }
    }

    /// Returns the hover hint shown while disabled.
    pub fn hint(&self, locale: Locale) -> Option<String> {
        self.disabled_reason
            .map(|reason| Message::CaptureDisabled { reason }.text(locale))
    }
}
