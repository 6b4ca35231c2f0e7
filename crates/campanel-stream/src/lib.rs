#![warn(missing_docs)]
//! # campanel-stream
//!
//! ## Purpose
//! Owns the live preview connection and everything derived from it.
//!
//! ## Responsibilities
//! - Start, stop and toggle the MJPEG stream through [`DeviceLink`].
//! - Detect the first frame, stream errors and first-frame timeouts.
//! - Keep the preview surface in step with the stream state.
//! - Derive the capture control state from the stream state and the
//!   capture-in-flight flag.
//!
//! ## Data flow
//! `start` opens a [`StreamSource`] -> the host calls [`StreamController::pump`]
//! -> frames, errors and the watchdog drive [`StreamState`] transitions ->
//! [`StreamController::capture_control`] projects the result.
//!
//! ## Ownership and lifetimes
//! The controller owns the only stream handle. Dropping or replacing it
//! closes the connection, so no handle outlives a stop.
//!
//! ## Error model
//! Stream failures are states, not errors: they surface as
//! [`StreamChange::Failed`] / [`StreamChange::TimedOut`] and a placeholder.
//!
//! ## Example
//! ```rust
//! use campanel_stream::{StreamState, derive_capture_control};
//! use campanel_ui::DisableReason;
//!
//! let control = derive_capture_control(StreamState::Active, DisableReason::NotStarted, false);
//! assert!(control.enabled);
//! ```

use std::time::Duration;

use campanel_core::Timer;
use campanel_link::{DeviceLink, StreamEvent, StreamSource};
use campanel_ui::{CaptureControl, DisableReason, PreviewSurface};
use tracing::{debug, info, warn};

/// Lifecycle state of the live stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No connection.
    Stopped,
    /// Connection requested, no frame yet.
    Connecting,
    /// Frames are arriving.
    Active,
}

impl StreamState {
    /// Returns `true` while a connection is attached.
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

/// Transition observed by [`StreamController::pump`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamChange {
    /// First frame arrived.
    Connected,
    /// The stream reported an error.
    Failed,
    /// No frame arrived before the watchdog fired.
    TimedOut,
}

/// Projects the capture control from stream state and the capture lock.
pub fn derive_capture_control(
    state: StreamState,
    stop_reason: DisableReason,
    capture_in_flight: bool,
) -> CaptureControl {
    let disabled_reason = if capture_in_flight {
        Some(DisableReason::Capturing)
    } else {
        match state {
            StreamState::Active => None,
            StreamState::Connecting => Some(DisableReason::Connecting),
            StreamState::Stopped => Some(stop_reason),
        }
    };

    CaptureControl {
        enabled: disabled_reason.is_none(),
        disabled_reason,
    }
}

/// Live preview lifecycle.
pub struct StreamController {
    link: DeviceLink,
    state: StreamState,
    source: Option<Box<dyn StreamSource>>,
    generation: u64,
    watchdog: Timer,
    first_frame_timeout: Duration,
    surface: PreviewSurface,
    stop_reason: DisableReason,
}

impl StreamController {
    /// Creates a stopped controller. The first-frame watchdog uses
    /// `link.timeouts().stream_first_frame`.
    pub fn new(link: DeviceLink) -> Self {
        let first_frame_timeout = link.timeouts().stream_first_frame;
        Self {
            link,
            state: StreamState::Stopped,
            source: None,
            generation: 0,
            watchdog: Timer::idle(),
            first_frame_timeout,
            surface: PreviewSurface::Idle,
            stop_reason: DisableReason::NotStarted,
        }
    }

    /// Current state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Returns `true` while connecting or active.
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    /// Generation of the most recent start attempt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Why the stream last stopped.
    pub fn stop_reason(&self) -> DisableReason {
        self.stop_reason
    }

    /// Current preview surface.
    pub fn surface(&self) -> &PreviewSurface {
        &self.surface
    }

    /// Returns `true` while the first-frame watchdog is armed.
    pub fn watchdog_armed(&self) -> bool {
        self.watchdog.is_armed()
    }

    /// Projects the capture control.
    pub fn capture_control(&self, capture_in_flight: bool) -> CaptureControl {
        derive_capture_control(self.state, self.stop_reason, capture_in_flight)
    }

    /// Opens a new stream. Only valid while stopped.
    ///
    /// Returns `true` when a connection is now pending. A synchronous open
    /// failure is handled like a stream error.
    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.state != StreamState::Stopped {
            debug!(state = ?self.state, "start ignored; stream already live");
            return false;
        }

        self.generation += 1;
        match self.link.open_stream() {
            Ok(source) => {
                self.source = Some(source);
                self.state = StreamState::Connecting;
                self.surface = PreviewSurface::Connecting;
                self.watchdog.arm(now_ms, self.first_frame_timeout);
                info!(generation = self.generation, "live stream connecting");
                true
            }
            Err(error) => {
                warn!(generation = self.generation, %error, "live stream could not be opened");
                self.surface = PreviewSurface::StreamFailed;
                self.stop_reason = DisableReason::StreamFailed;
                false
            }
        }
    }

    /// Closes the stream and restores the idle placeholder.
    ///
    /// Returns `true` if a stream was live. Calling it while stopped changes
    /// nothing.
    pub fn stop(&mut self) -> bool {
        if !self.is_live() {
            return false;
        }

        self.release();
        self.surface = PreviewSurface::Idle;
        self.stop_reason = DisableReason::PreviewStopped;
        info!(generation = self.generation, "live stream stopped");
        true
    }

    /// Stops a live stream or starts a stopped one. Returns the new liveness.
    pub fn toggle(&mut self, now_ms: u64) -> bool {
        if self.is_live() {
            self.stop();
            false
        } else {
            self.start(now_ms)
        }
    }

    /// Delivers pending stream events and runs the first-frame watchdog.
    pub fn pump(&mut self, now_ms: u64) -> Option<StreamChange> {
        let mut change = None;

        while let Some(event) = self.source.as_mut().and_then(|source| source.poll_event()) {
            match event {
                StreamEvent::Frame(frame) => {
                    self.surface.push_frame(frame);
                    if self.state == StreamState::Connecting {
                        self.watchdog.cancel();
                        self.state = StreamState::Active;
                        info!(generation = self.generation, "live stream connected");
                        change = Some(StreamChange::Connected);
                    }
                }
                StreamEvent::Failed(reason) => {
                    warn!(generation = self.generation, %reason, "live stream failed");
                    self.release();
                    self.surface = PreviewSurface::StreamFailed;
                    self.stop_reason = DisableReason::StreamFailed;
                    return Some(StreamChange::Failed);
                }
            }
        }

        if self.state == StreamState::Connecting && self.watchdog.fire_if_due(now_ms) {
            warn!(
                generation = self.generation,
                timeout_ms = self.first_frame_timeout.as_millis() as u64,
                "no stream frame before watchdog"
            );
            self.release();
            self.surface = PreviewSurface::StreamTimedOut;
            self.stop_reason = DisableReason::StreamTimeout;
            return Some(StreamChange::TimedOut);
        }

        change
    }

    /// Shows a still surface (stored photo, idle). Ignored while live.
    pub fn show_still(&mut self, surface: PreviewSurface) -> bool {
        if self.is_live() {
            debug!("still surface ignored while stream is live");
            return false;
        }
        self.surface = surface;
        true
    }

    fn release(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.close();
        }
        self.watchdog.cancel();
        self.state = StreamState::Stopped;
    }
}

impl Drop for StreamController {
    fn drop(&mut self) {
        self.release();
    }
}
