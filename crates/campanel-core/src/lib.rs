#![warn(missing_docs)]
//! # campanel-core
//!
//! ## Purpose
//! Defines the pure data model and timing primitives shared across the
//! `campanel` workspace.
//!
//! ## Responsibilities
//! - Represent the device replies (file listing, storage summary, hardware
//!   snapshot, capture and delete replies).
//! - Decode raw reply bodies with contract checks.
//! - Provide the error-kind taxonomy consumed by coordinators and renderers.
//! - Provide the injectable [`Clock`], the one-shot [`Timer`] and the
//!   deadline/interval [`poll_until`] primitive.
//!
//! ## Data flow
//! Device Link receives raw bodies -> `parse_*` helpers decode them into the
//! types below -> coordinators hand them to view renderers.
//!
//! ## Ownership and lifetimes
//! All decoded values own their strings so they can outlive the transient
//! response buffers they came from.
//!
//! ## Error model
//! Undecodable or structurally wrong bodies return [`CoreError`]; callers map
//! it to [`ErrorKind::Malformed`].
//!
//! ## Example
//! ```rust
//! use campanel_core::{parse_capture_reply, CaptureReply};
//!
//! let reply = parse_capture_reply(br#"{"success":true,"filename":"photo_001.jpg"}"#).unwrap();
//! assert_eq!(reply.filename.as_deref(), Some("photo_001.jpg"));
//! ```

mod clock;
mod poll;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use poll::{PollOutcome, PollPolicy, poll_until};
pub use timer::Timer;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One file stored on the device card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name as reported by the device.
    pub name: String,
    /// File size in bytes; older firmware omits it.
    #[serde(default, alias = "sizeBytes")]
    pub size: u64,
}

/// Reply of the file listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListing {
    /// Files in device order.
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

/// Reply of the storage summary endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    /// Card capacity in bytes.
    pub total_bytes: u64,
    /// Bytes in use.
    pub used_bytes: u64,
    /// Number of stored files.
    pub file_count: u64,
    /// Usage in percent as computed by the device.
    pub usage_percent: f64,
}

/// Hardware diagnostics reported by the device.
///
/// Every field is kept as the raw JSON scalar so it can be rendered verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSnapshot {
    /// SoC model name.
    #[serde(default)]
    pub chip_model: Value,
    /// SoC revision.
    #[serde(default)]
    pub chip_revision: Value,
    /// CPU core count.
    #[serde(default)]
    pub cpu_cores: Value,
    /// CPU clock in MHz.
    #[serde(default, rename = "cpuFreqMHz")]
    pub cpu_freq_mhz: Value,
    /// Flash size in MB.
    #[serde(default, rename = "flashSizeMB")]
    pub flash_size_mb: Value,
    /// PSRAM size in KB.
    #[serde(default, rename = "psramSizeKB")]
    pub psram_size_kb: Value,
    /// Station MAC address.
    #[serde(default)]
    pub mac_address: Value,
    /// Board type label.
    #[serde(default)]
    pub board_type: Value,
    /// Camera sensor model.
    #[serde(default)]
    pub camera_sensor: Value,
    /// Configured frame size.
    #[serde(default)]
    pub frame_size: Value,
    /// Configured JPEG quality.
    #[serde(default)]
    pub jpeg_quality: Value,
}

/// Reply of the capture endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureReply {
    /// Whether the device stored a photo.
    pub success: bool,
    /// Stored file name on success.
    #[serde(default)]
    pub filename: Option<String>,
    /// Device error message on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply of the delete endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReply {
    /// Whether the file was removed.
    pub success: bool,
    /// Device error message on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// Failure categories every device call is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request exceeded its timeout and was aborted.
    Timeout,
    /// The device could not be reached (refused, DNS, reset).
    Unreachable,
    /// The device answered with a non-success HTTP status.
    Http {
        /// Returned status code.
        status: u16,
    },
    /// The device answered with a body that violates the reply contract.
    Malformed,
    /// Any other failure.
    Other,
}

/// Decodes a capture reply body.
///
/// # Errors
/// Returns [`CoreError::Decode`] for invalid JSON.
pub fn parse_capture_reply(raw: &[u8]) -> Result<CaptureReply, CoreError> {
    decode(raw)
}

/// Decodes a delete reply body.
///
/// # Errors
/// Returns [`CoreError::Decode`] for invalid JSON.
pub fn parse_delete_reply(raw: &[u8]) -> Result<DeleteReply, CoreError> {
    decode(raw)
}

/// Decodes a file listing body.
///
/// # Errors
/// Returns [`CoreError::Decode`] for invalid JSON.
pub fn parse_file_listing(raw: &[u8]) -> Result<FileListing, CoreError> {
    decode(raw)
}

/// Decodes a storage summary body.
///
/// # Errors
/// Returns [`CoreError::Decode`] for invalid JSON or missing fields.
pub fn parse_storage_summary(raw: &[u8]) -> Result<StorageSummary, CoreError> {
    decode(raw)
}

/// Decodes a hardware snapshot body.
///
/// Missing fields are tolerated; the body itself must be a JSON object.
///
/// # Errors
/// Returns [`CoreError::Decode`] for invalid JSON.
/// Returns [`CoreError::InvalidContract`] when the body is not an object.
pub fn parse_hardware_snapshot(raw: &[u8]) -> Result<HardwareSnapshot, CoreError> {
    let value: Value = decode(raw)?;
    if !value.is_object() {
        return Err(CoreError::InvalidContract(
            "hardware snapshot must be a JSON object".to_string(),
        ));
    }
    serde_json::from_value(value).map_err(CoreError::Decode)
}

fn decode<T: DeserializeOwned>(raw: &[u8]) -> Result<T, CoreError> {
    serde_json::from_slice(raw).map_err(CoreError::Decode)
}

/// Error type for reply decoding.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON decode failure.
    #[error("reply decode failure: {0}")]
    Decode(#[from] serde_json::Error),
    /// Reply decoded but violates the expected shape.
    #[error("reply contract violation: {0}")]
    InvalidContract(String),
}
