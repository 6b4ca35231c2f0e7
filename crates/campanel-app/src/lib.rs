#![warn(missing_docs)]
//! # campanel-app
//!
//! ## Purpose
//! Orchestrates the camera panel: live preview, still capture, reboot,
//! hardware modal, file library and storage views.
//!
//! ## Responsibilities
//! - Own the single [`Panel`] session: stream controller, capture lock,
//!   delayed timers, modal, toasts and library views.
//! - Sequence the capture flow (stop, notify, capture, resume) and the reboot
//!   flow (confirm, trigger, health poll, reload).
//! - Load [`PanelConfig`] from the environment and install logging.
//! - Parse terminal host commands.
//!
//! ## Data flow
//! Host input -> [`Command`] -> [`Panel`] operation -> `DeviceLink` calls ->
//! view state (stream surface, modal, toasts, library) -> host renders it.
//! The host calls [`Panel::pump`] on every tick to deliver stream events and
//! fire timers.
//!
//! ## Ownership and lifetimes
//! The panel owns every piece of session state. The clock and transport are
//! shared behind `Arc` so tests can keep handles to them.
//!
//! ## Error model
//! Device failures never escape the coordinators; they become report values
//! and toasts. [`AppError`] covers startup failures only (configuration,
//! transport construction, logging, terminal I/O).

mod capture;
mod command;
mod config;
mod hardware;
mod library;
mod panel;
mod reboot;
mod telemetry;

use campanel_link::LinkError;
use thiserror::Error;

pub use capture::{CaptureLock, CaptureLockGuard, CaptureReport, CaptureResult};
pub use command::{Command, HELP_TEXT};
pub use config::{
    ConfigError, DEFAULT_DEVICE_URL, DEFAULT_LOG_FILTER, DEVICE_URL_ENV, LOCALE_ENV, LOG_ENV,
    PanelConfig, validate_device_url,
};
pub use library::{DeleteReport, PhotoReport};
pub use panel::{Panel, PanelHost};
pub use reboot::RebootOutcome;
pub use telemetry::init_tracing;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("CAMPANEL_VERSION");

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// App startup error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    /// Transport construction failure.
    #[error("link error: {0}")]
    Link(#[from] LinkError),
    /// Logging could not be installed.
    #[error("telemetry error: {0}")]
    Telemetry(String),
    /// Terminal I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
