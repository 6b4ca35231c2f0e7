#![warn(missing_docs)]
//! # campanel-link
//!
//! ## Purpose
//! Typed access to the camera device's HTTP endpoints.
//!
//! ## Responsibilities
//! - Describe every endpoint call as a [`DeviceRequest`] with its own timeout
//!   policy ([`TimeoutPolicy`]).
//! - Execute requests through an injectable [`DeviceTransport`].
//! - Classify failures into [`LinkError`] / [`campanel_core::ErrorKind`].
//! - Open the live MJPEG stream as a [`StreamSource`].
//!
//! ## Data flow
//! Coordinator -> [`DeviceLink`] operation -> [`DeviceTransport::execute`] ->
//! [`DeviceResponse`] -> status check -> `campanel_core::parse_*` -> typed
//! result.
//!
//! ## Ownership and lifetimes
//! The transport is shared behind `Arc`; stream sources are boxed and owned
//! exclusively by whoever opened them.
//!
//! ## Error model
//! Timeouts, unreachable devices, non-success statuses and contract
//! violations are distinct [`LinkError`] variants. Device-reported logical
//! failures are not errors; they surface as `Rejected` outcomes.

mod client;
mod error;
mod http;
mod mjpeg;
mod request;
mod transport;

pub use client::{CaptureOutcome, DeleteOutcome, DeviceLink};
pub use error::LinkError;
pub use http::{HttpStream, HttpTransport};
pub use mjpeg::MjpegScanner;
pub use request::{
    CAPTURE_PATH, DELETE_PATH, DeviceRequest, DeviceResponse, FILES_PATH, HARDWARE_PATH, Method,
    PHOTO_PATH, REBOOT_PATH, SDINFO_PATH, STREAM_PATH, STREAM_STOP_PATH, TimeoutPolicy,
};
pub use transport::{DeviceTransport, StreamEvent, StreamSource};
