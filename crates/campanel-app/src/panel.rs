use std::sync::Arc;
use std::time::Duration;

use campanel_core::{Clock, Timer};
use campanel_link::{DeviceLink, HttpTransport, TimeoutPolicy};
use campanel_stream::{StreamChange, StreamController, StreamState};
use campanel_ui::{
    CaptureControl, FileListState, HardwareModal, Locale, Notifications, PreviewSurface,
    StorageView,
};
use tracing::{debug, info, warn};

use crate::{AppError, CaptureLock, PanelConfig};

/// Interaction points the panel needs from its host.
pub trait PanelHost {
    /// Asks the user a yes/no question.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// Reloads the panel, bypassing caches with the `target` query.
    fn reload(&mut self, target: &str);
}

/// One panel session bound to one device.
pub struct Panel {
    pub(crate) link: DeviceLink,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) locale: Locale,
    pub(crate) timeouts: TimeoutPolicy,
    pub(crate) stream: StreamController,
    pub(crate) capture_lock: CaptureLock,
    pub(crate) capture_reset: Timer,
    pub(crate) pending_restart: Timer,
    pub(crate) preview_before_modal: bool,
    pub(crate) modal: HardwareModal,
    pub(crate) toasts: Notifications,
    pub(crate) files: FileListState,
    pub(crate) storage: Option<StorageView>,
}

impl Panel {
    /// Creates a panel over `link`.
    pub fn new(link: DeviceLink, clock: Arc<dyn Clock>, locale: Locale) -> Self {
        let timeouts = link.timeouts().clone();
        Self {
            stream: StreamController::new(link.clone()),
            link,
            clock,
            locale,
            timeouts,
            capture_lock: CaptureLock::new(),
            capture_reset: Timer::idle(),
            pending_restart: Timer::idle(),
            preview_before_modal: false,
            modal: HardwareModal::Closed,
            toasts: Notifications::new(),
            files: FileListState::NotLoaded,
            storage: None,
        }
    }

    /// Creates a panel talking HTTP to `config.device_url`.
    ///
    /// # Errors
    /// Returns [`AppError::Link`] when the transport cannot be built.
    pub fn from_config(config: &PanelConfig, clock: Arc<dyn Clock>) -> Result<Self, AppError> {
        let transport = HttpTransport::new(config.device_url.clone(), config.timeouts.stream_connect)?;
        let link = DeviceLink::new(Arc::new(transport), config.timeouts.clone());
        Ok(Self::new(link, clock, config.locale))
    }

    /// Loads the library views and checks connectivity once.
    ///
    /// The stream stays stopped until the user starts it.
    pub fn initialize(&mut self) {
        self.refresh_file_list();
        self.refresh_storage();

        match self.link.probe(self.timeouts.startup_probe) {
            Ok(()) => info!("device reachable"),
            Err(error) => warn!(
                %error,
                "device connectivity check failed; hardware info may time out"
            ),
        }
    }

    /// Delivers stream events, fires due timers and expires toasts.
    pub fn pump(&mut self) -> Option<StreamChange> {
        let now = self.clock.now_ms();
        let change = self.stream.pump(now);

        if self.pending_restart.fire_if_due(now) {
            if self.modal.is_open() {
                debug!("delayed preview restart skipped; modal is open");
            } else {
                info!("restarting live preview");
                self.stream.start(now);
            }
        }

        if self.capture_reset.fire_if_due(now) && self.capture_lock.force_release() {
            warn!("capture lock still held after completion; force released");
        }

        self.toasts.prune(now);
        change
    }

    /// Starts a stopped preview or stops a live one. Returns the new liveness.
    pub fn toggle_preview(&mut self) -> bool {
        self.pending_restart.cancel();
        let now = self.clock.now_ms();
        self.stream.toggle(now)
    }

    /// Capture control projection.
    pub fn capture_control(&self) -> CaptureControl {
        self.stream.capture_control(self.capture_lock.is_held())
    }

    /// Returns `true` while a capture holds the lock.
    pub fn capture_in_flight(&self) -> bool {
        self.capture_lock.is_held()
    }

    /// Capture lock, shared with the capture flow.
    pub fn capture_lock(&self) -> &CaptureLock {
        &self.capture_lock
    }

    /// Stream lifecycle state.
    pub fn stream_state(&self) -> StreamState {
        self.stream.state()
    }

    /// Generation of the latest stream start.
    pub fn stream_generation(&self) -> u64 {
        self.stream.generation()
    }

    /// Preview area.
    pub fn surface(&self) -> &PreviewSurface {
        self.stream.surface()
    }

    /// Hardware modal.
    pub fn modal(&self) -> &HardwareModal {
        &self.modal
    }

    /// Toast stack.
    pub fn toasts(&self) -> &Notifications {
        &self.toasts
    }

    /// File list view.
    pub fn file_list(&self) -> &FileListState {
        &self.files
    }

    /// Storage summary view; `None` until the first refresh.
    pub fn storage(&self) -> Option<&StorageView> {
        self.storage.as_ref()
    }

    /// Display language.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Due time of the delayed preview restart, if one is scheduled.
    pub fn restart_due_ms(&self) -> Option<u64> {
        self.pending_restart.due_ms()
    }

    /// Whether closing the modal will restart the preview.
    pub fn restores_preview_on_close(&self) -> bool {
        self.preview_before_modal
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub(crate) fn schedule_restart(&mut self, delay: Duration) {
        let now = self.now_ms();
        self.pending_restart.arm(now, delay);
        debug!(due_ms = now + delay.as_millis() as u64, "preview restart scheduled");
    }
}
