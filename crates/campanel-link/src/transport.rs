use crate::{DeviceRequest, DeviceResponse, LinkError};

/// Something that can carry requests to the device.
///
/// Implementations must enforce [`DeviceRequest::timeout`] and report an
/// exceeded timeout as [`LinkError::Timeout`]. Non-success statuses are
/// returned as `Ok` responses; [`crate::DeviceLink`] maps them.
pub trait DeviceTransport: Send + Sync {
    /// Executes one request.
    fn execute(&self, request: &DeviceRequest) -> Result<DeviceResponse, LinkError>;

    /// Opens a continuous image stream at `path`.
    ///
    /// Must return promptly; connection progress and failures are reported
    /// through [`StreamSource::poll_event`].
    fn open_stream(&self, path: &str) -> Result<Box<dyn StreamSource>, LinkError>;
}

/// Event produced by an open stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One complete JPEG frame.
    Frame(Vec<u8>),
    /// The stream failed or was closed by the device.
    Failed(String),
}

/// An open live stream connection.
pub trait StreamSource: Send {
    /// Returns the next pending event without blocking.
    fn poll_event(&mut self) -> Option<StreamEvent>;

    /// Releases the connection. After `close`, no further events are produced.
    fn close(&mut self);
}
