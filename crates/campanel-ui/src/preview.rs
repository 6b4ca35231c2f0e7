//! Preview area model.

use crate::{Locale, Message};

/// What the preview area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewSurface {
    /// Nothing selected.
    #[default]
    Idle,
    /// Live stream requested, no frame yet.
    Connecting,
    /// Live stream delivering frames.
    Live {
        /// Frames shown since the stream started.
        frames: u64,
        /// Most recent JPEG frame.
        latest: Vec<u8>,
    },
    /// Live stream reported an error.
    StreamFailed,
    /// Live stream produced no frame in time.
    StreamTimedOut,
    /// Stored photo requested.
    PhotoLoading {
        /// Requested file.
        name: String,
    },
    /// Stored photo shown.
    Photo {
        /// Shown file.
        name: String,
        /// JPEG bytes.
        data: Vec<u8>,
    },
    /// Stored photo failed; the host offers a retry.
    PhotoFailed {
        /// Failed file.
        name: String,
    },
}

impl PreviewSurface {
    /// Returns the placeholder text, or `None` when an image is shown.
    pub fn placeholder(&self, locale: Locale) -> Option<String> {
        let message = match self {
            Self::Idle => Message::SelectFilePlaceholder,
            Self::Connecting => Message::ConnectingPlaceholder,
            Self::StreamFailed => Message::StreamFailedPlaceholder,
            Self::StreamTimedOut => Message::StreamTimeoutPlaceholder,
            Self::PhotoLoading { .. } => Message::PhotoLoadingPlaceholder,
            Self::PhotoFailed { name } => Message::PhotoFailedPlaceholder { name: name.clone() },
            Self::Live { .. } | Self::Photo { .. } => return None,
        };
        Some(message.text(locale))
    }

    /// Returns `true` when the surface shows or is loading the stored file `name`.
    pub fn shows_photo(&self, name: &str) -> bool {
        match self {
            Self::PhotoLoading { name: shown }
            | Self::Photo { name: shown, .. }
            | Self::PhotoFailed { name: shown } => shown == name,
            _ => false,
        }
    }

    /// Records one live frame. Switches from connecting to live on the first.
    pub fn push_frame(&mut self, frame: Vec<u8>) {
        match self {
            Self::Live { frames, latest } => {
                *frames += 1;
                *latest = frame;
            }
            _ => {
                *self = Self::Live {
                    frames: 1,
                    latest: frame,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn images_have_no_placeholder() {
        let mut surface = PreviewSurface::Connecting;
        assert!(surface.placeholder(Locale::English).is_some());

        surface.push_frame(vec![0xFF, 0xD8]);
        surface.push_frame(vec![0xFF, 0xD9]);
        assert_eq!(
            surface,
            PreviewSurface::Live {
                frames: 2,
                latest: vec![0xFF, 0xD9]
            }
        );
        assert_eq!(surface.placeholder(Locale::English), None);
    }

    #[test]
    fn photo_matching_covers_every_photo_state() {
        let failed = PreviewSurface::PhotoFailed {
            name: "a.jpg".to_string(),
        };
        assert!(failed.shows_photo("a.jpg"));
        assert!(!failed.shows_photo("b.jpg"));
        assert!(!PreviewSurface::Idle.shows_photo("a.jpg"));
    }
}
