//! Transient toast notifications.

use std::time::Duration;

/// Lifetime of a non-persistent toast.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Progress note.
    Info,
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Sequence number, unique per [`Notifications`] stack.
    pub id: u64,
    /// Severity.
    pub kind: ToastKind,
    /// Localized text.
    pub text: String,
    /// Clock time the toast was raised.
    pub raised_at_ms: u64,
    /// Expiry time; `None` stays until cleared.
    pub expires_at_ms: Option<u64>,
}

impl Toast {
    /// Returns `true` while the toast should be shown at `now_ms`.
    pub fn is_visible(&self, now_ms: u64) -> bool {
        self.expires_at_ms.is_none_or(|expires| now_ms < expires)
    }
}

/// Ordered toast stack.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Notifications {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises a toast that expires after [`TOAST_TTL`].
    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>, now_ms: u64) {
        let expires = now_ms.saturating_add(TOAST_TTL.as_millis() as u64);
        self.raise(kind, text.into(), now_ms, Some(expires));
    }

    /// Raises a toast that stays until [`Notifications::clear`].
    pub fn push_persistent(&mut self, kind: ToastKind, text: impl Into<String>, now_ms: u64) {
        self.raise(kind, text.into(), now_ms, None);
    }

    fn raise(&mut self, kind: ToastKind, text: String, now_ms: u64, expires_at_ms: Option<u64>) {
        self.next_id += 1;
        self.toasts.push(Toast {
            id: self.next_id,
            kind,
            text,
            raised_at_ms: now_ms,
            expires_at_ms,
        });
    }

    /// Drops expired toasts and returns how many were removed.
    pub fn prune(&mut self, now_ms: u64) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.is_visible(now_ms));
        before - self.toasts.len()
    }

    /// Returns toasts visible at `now_ms`, oldest first.
    pub fn visible(&self, now_ms: u64) -> Vec<&Toast> {
        self.toasts
            .iter()
            .filter(|toast| toast.is_visible(now_ms))
            .collect()
    }

    /// Returns the most recently raised toast, expired or not.
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Returns every retained toast.
    pub fn all(&self) -> &[Toast] {
        &self.toasts
    }

    /// Returns retained toasts raised after the toast with id `seen`.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &Toast> {
        self.toasts.iter().filter(move |toast| toast.id > seen)
    }

    /// Removes every toast, persistent ones included.
    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}
