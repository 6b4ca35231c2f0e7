//! Endpoint paths, request/response values and per-endpoint timeouts.

use std::time::Duration;

use campanel_core::PollPolicy;

/// MJPEG stream (GET) and liveness probe (HEAD).
pub const STREAM_PATH: &str = "/app/stream";
/// Asks the device to leave its streaming loop.
pub const STREAM_STOP_PATH: &str = "/app/stream/stop";
/// Triggers a still capture.
pub const CAPTURE_PATH: &str = "/app/capture";
/// Lists stored files.
pub const FILES_PATH: &str = "/app/files";
/// Deletes one stored file (`?name=`).
pub const DELETE_PATH: &str = "/app/delete";
/// Storage summary.
pub const SDINFO_PATH: &str = "/app/sdinfo";
/// Hardware snapshot.
pub const HARDWARE_PATH: &str = "/app/hardware";
/// Triggers a reboot.
pub const REBOOT_PATH: &str = "/app/reboot";
/// Fetches one stored image (`?name=`).
pub const PHOTO_PATH: &str = "/app/photo";

/// HTTP methods used by the device contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// HEAD
    Head,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// One outbound call to the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRequest {
    /// HTTP method.
    pub method: Method,
    /// Path plus encoded query, relative to the device base URL.
    pub path: String,
    /// Whole-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Sends `Accept: application/json`.
    pub accept_json: bool,
    /// Sends `Cache-Control: no-store`.
    pub no_store: bool,
    /// JSON body, sent with `Content-Type: application/json`.
    pub json_body: Option<String>,
}

impl DeviceRequest {
    /// Creates a request with no timeout, headers or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            timeout: None,
            accept_json: false,
            no_store: false,
            json_body: None,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Requests a JSON reply.
    pub fn accepting_json(mut self) -> Self {
        self.accept_json = true;
        self
    }

    /// Disables intermediary caching.
    pub fn uncached(mut self) -> Self {
        self.no_store = true;
        self
    }

    /// Attaches a JSON body.
    pub fn with_json_body(mut self, body: impl Into<String>) -> Self {
        self.json_body = Some(body.into());
        self
    }

    /// Returns `"METHOD path"`, used for logging and test routing.
    pub fn route(&self) -> String {
        format!("{} {}", self.method.as_str(), self.path)
    }
}

/// Raw device reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reply body; empty for HEAD.
    pub body: Vec<u8>,
}

impl DeviceResponse {
    /// Creates a reply.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Timeout and delay policy for every device interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutPolicy {
    /// Time allowed between stream start and the first frame.
    pub stream_first_frame: Duration,
    /// TCP connect budget of the stream connection.
    pub stream_connect: Duration,
    /// Best-effort stream stop notification.
    pub stream_stop: Duration,
    /// Pause after the stop notification so the device can leave its loop.
    pub stream_release_delay: Duration,
    /// Still capture request.
    pub capture: Duration,
    /// Lock safety net after a capture completes.
    pub capture_forced_reset: Duration,
    /// Hardware snapshot request.
    pub hardware: Duration,
    /// Fire-and-forget reboot request.
    pub reboot: Duration,
    /// One liveness probe while waiting for a reboot.
    pub probe: Duration,
    /// Pause between liveness probes.
    pub probe_interval: Duration,
    /// Overall budget for the device to come back after a reboot.
    pub reboot_deadline: Duration,
    /// Startup connectivity check.
    pub startup_probe: Duration,
    /// Delay before a stream restart after a modal closes or a reboot is declined.
    pub restart_delay: Duration,
    /// Photo fetches slower than this are reported.
    pub photo_slow_notice: Duration,
}

impl TimeoutPolicy {
    /// Health-poll policy used after a reboot request.
    pub fn reboot_poll(&self) -> PollPolicy {
        PollPolicy {
            interval: self.probe_interval,
            deadline: self.reboot_deadline,
        }
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self {
            stream_first_frame: Duration::from_secs(5),
            stream_connect: Duration::from_secs(5),
            stream_stop: Duration::from_secs(2),
            stream_release_delay: Duration::from_millis(50),
            capture: Duration::from_secs(15),
            capture_forced_reset: Duration::from_secs(1),
            hardware: Duration::from_secs(20),
            reboot: Duration::from_millis(1_500),
            probe: Duration::from_millis(1_500),
            probe_interval: Duration::from_millis(1_200),
            reboot_deadline: Duration::from_secs(30),
            startup_probe: Duration::from_secs(3),
            restart_delay: Duration::from_millis(100),
            photo_slow_notice: Duration::from_secs(10),
        }
    }
}
