//! Hardware information modal.

/// Input delivered to an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalInput {
    /// The close control.
    CloseButton,
    /// The Escape key.
    Escape,
    /// A click on the backdrop outside the modal body.
    Backdrop,
    /// A click inside the modal body.
    BodyClick,
    /// Any other key.
    OtherKey,
}

impl ModalInput {
    /// Returns `true` when the input dismisses the modal.
    pub fn dismisses(self) -> bool {
        matches!(self, Self::CloseButton | Self::Escape | Self::Backdrop)
    }
}

/// One labelled value of the hardware table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoRow {
    /// Row label.
    pub label: String,
    /// Rendered value.
    pub value: String,
}

/// Body of the open modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalContent {
    /// Snapshot request in flight.
    Loading,
    /// Snapshot rendered as rows.
    Loaded(Vec<InfoRow>),
    /// Snapshot failed.
    Failed {
        /// One-line failure summary.
        summary: String,
        /// Troubleshooting hint, when the cause is known.
        hint: Option<String>,
    },
}

/// Modal visibility and content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HardwareModal {
    /// Not shown.
    #[default]
    Closed,
    /// Shown with the given body.
    Open(ModalContent),
}

impl HardwareModal {
    /// Returns `true` while the modal is shown.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Returns the body of the open modal.
    pub fn content(&self) -> Option<&ModalContent> {
        match self {
            Self::Open(content) => Some(content),
            Self::Closed => None,
        }
    }

    /// Opens the modal in the loading state. Returns `false` if already open.
    pub fn open_loading(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        *self = Self::Open(ModalContent::Loading);
        true
    }

    /// Replaces the body with loaded rows. Ignored when closed.
    pub fn show_rows(&mut self, rows: Vec<InfoRow>) {
        if self.is_open() {
            *self = Self::Open(ModalContent::Loaded(rows));
        }
    }

    /// Replaces the body with a failure. Ignored when closed.
    pub fn show_failure(&mut self, summary: String, hint: Option<String>) {
        if self.is_open() {
            *self = Self::Open(ModalContent::Failed { summary, hint });
        }
    }

    /// Closes the modal. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        std::mem::take(self).is_open()
    }
}
