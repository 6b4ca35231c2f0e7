use std::sync::Arc;
use std::time::Duration;

use campanel_core::{
    FileListing, HardwareSnapshot, StorageSummary, parse_capture_reply, parse_delete_reply,
    parse_file_listing, parse_hardware_snapshot, parse_storage_summary,
};
use tracing::debug;
use url::form_urlencoded;

use crate::{
    CAPTURE_PATH, DELETE_PATH, DeviceRequest, DeviceResponse, DeviceTransport, FILES_PATH,
    HARDWARE_PATH, LinkError, Method, PHOTO_PATH, REBOOT_PATH, SDINFO_PATH, STREAM_PATH,
    STREAM_STOP_PATH, StreamSource, TimeoutPolicy,
};

/// Result of a capture request that reached the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The device stored a photo.
    Saved {
        /// Stored file name.
        filename: String,
    },
    /// The device reported a failure.
    Rejected {
        /// Device-supplied message.
        message: String,
    },
}

/// Result of a delete request that reached the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The file was removed.
    Deleted,
    /// The device reported a failure.
    Rejected {
        /// Device-supplied message.
        message: String,
    },
}

const UNKNOWN_DEVICE_ERROR: &str = "unknown device error";

/// Typed client over every device endpoint.
#[derive(Clone)]
pub struct DeviceLink {
    transport: Arc<dyn DeviceTransport>,
    timeouts: TimeoutPolicy,
}

impl DeviceLink {
    /// Creates a link over `transport` using `timeouts` for every call.
    pub fn new(transport: Arc<dyn DeviceTransport>, timeouts: TimeoutPolicy) -> Self {
        Self {
            transport,
            timeouts,
        }
    }

    /// Returns the timeout policy.
    pub fn timeouts(&self) -> &TimeoutPolicy {
        &self.timeouts
    }

    /// Opens the live MJPEG stream.
    ///
    /// # Errors
    /// Propagates transport failures to set up the stream.
    pub fn open_stream(&self) -> Result<Box<dyn StreamSource>, LinkError> {
        self.transport.open_stream(STREAM_PATH)
    }

    /// Issues one uncached HEAD liveness probe bounded by `timeout`.
    ///
    /// # Errors
    /// Returns the transport failure or [`LinkError::Http`] for non-2xx.
    pub fn probe(&self, timeout: Duration) -> Result<(), LinkError> {
        let request = DeviceRequest::new(Method::Head, STREAM_PATH)
            .with_timeout(timeout)
            .uncached();
        self.send(&request).map(|_| ())
    }

    /// Asks the device to leave its streaming loop.
    ///
    /// # Errors
    /// Returns the transport failure; callers treat it as best-effort.
    pub fn stop_stream(&self) -> Result<(), LinkError> {
        let request = DeviceRequest::new(Method::Post, STREAM_STOP_PATH)
            .with_timeout(self.timeouts.stream_stop);
        self.send(&request).map(|_| ())
    }

    /// Triggers a still capture.
    ///
    /// # Errors
    /// Returns transport failures, non-2xx statuses and undecodable replies.
    pub fn capture(&self) -> Result<CaptureOutcome, LinkError> {
        let request = DeviceRequest::new(Method::Post, CAPTURE_PATH)
            .with_timeout(self.timeouts.capture)
            .accepting_json()
            .with_json_body("{}");
        let response = self.send(&request)?;
        let reply = parse_capture_reply(&response.body)?;

        if reply.success {
            Ok(CaptureOutcome::Saved {
                filename: reply.filename.unwrap_or_default(),
            })
        } else {
            Ok(CaptureOutcome::Rejected {
                message: reply
                    .error
                    .unwrap_or_else(|| UNKNOWN_DEVICE_ERROR.to_string()),
            })
        }
    }

    /// Lists stored files.
    ///
    /// # Errors
    /// Returns transport failures, non-2xx statuses and undecodable replies.
    pub fn list_files(&self) -> Result<FileListing, LinkError> {
        let response = self.send(&DeviceRequest::new(Method::Get, FILES_PATH).accepting_json())?;
        Ok(parse_file_listing(&response.body)?)
    }

    /// Deletes one stored file.
    ///
    /// # Errors
    /// Returns transport failures, non-2xx statuses and undecodable replies.
    pub fn delete_file(&self, name: &str) -> Result<DeleteOutcome, LinkError> {
        let request =
            DeviceRequest::new(Method::Delete, with_name_query(DELETE_PATH, name)).accepting_json();
        let response = self.send(&request)?;
        let reply = parse_delete_reply(&response.body)?;

        if reply.success {
            Ok(DeleteOutcome::Deleted)
        } else {
            Ok(DeleteOutcome::Rejected {
                message: reply
                    .error
                    .unwrap_or_else(|| UNKNOWN_DEVICE_ERROR.to_string()),
            })
        }
    }

    /// Reads the storage summary.
    ///
    /// # Errors
    /// Returns transport failures, non-2xx statuses and undecodable replies.
    pub fn storage_summary(&self) -> Result<StorageSummary, LinkError> {
        let response = self.send(&DeviceRequest::new(Method::Get, SDINFO_PATH).accepting_json())?;
        Ok(parse_storage_summary(&response.body)?)
    }

    /// Reads the hardware snapshot.
    ///
    /// # Errors
    /// Returns transport failures, non-2xx statuses and undecodable replies.
    pub fn hardware_snapshot(&self) -> Result<HardwareSnapshot, LinkError> {
        let request = DeviceRequest::new(Method::Get, HARDWARE_PATH)
            .with_timeout(self.timeouts.hardware)
            .accepting_json();
        let response = self.send(&request)?;
        Ok(parse_hardware_snapshot(&response.body)?)
    }

    /// Sends the reboot request.
    ///
    /// # Errors
    /// Returns the transport failure; a dropped connection is expected here.
    pub fn reboot(&self) -> Result<(), LinkError> {
        let request =
            DeviceRequest::new(Method::Post, REBOOT_PATH).with_timeout(self.timeouts.reboot);
        self.send(&request).map(|_| ())
    }

    /// Downloads one stored image.
    ///
    /// # Errors
    /// Returns transport failures and non-2xx statuses.
    pub fn photo(&self, name: &str) -> Result<Vec<u8>, LinkError> {
        let response = self.send(&DeviceRequest::new(Method::Get, photo_path(name)))?;
        Ok(response.body)
    }

    fn send(&self, request: &DeviceRequest) -> Result<DeviceResponse, LinkError> {
        debug!(route = %request.route(), timeout_ms = ?request.timeout.map(|t| t.as_millis()), "device request");
        let response = self.transport.execute(request)?;
        if !response.is_success() {
            return Err(LinkError::Http {
                status: response.status,
            });
        }
        Ok(response)
    }
}

fn photo_path(name: &str) -> String {
    with_name_query(PHOTO_PATH, name)
}

fn with_name_query(path: &str, name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{path}?name={encoded}")
}
