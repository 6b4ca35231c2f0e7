use campanel_core::{CoreError, ErrorKind};
use thiserror::Error;

/// Failure of one device call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The request exceeded its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The device could not be reached.
    #[error("device unreachable: {0}")]
    Unreachable(String),
    /// The device answered with a non-success status.
    #[error("HTTP {status}")]
    Http {
        /// Returned status code.
        status: u16,
    },
    /// The reply body violates the reply contract.
    #[error("invalid response: {0}")]
    Malformed(String),
    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

impl LinkError {
    /// Projects the error onto the shared taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Unreachable(_) => ErrorKind::Unreachable,
            Self::Http { status } => ErrorKind::Http { status: *status },
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

impl From<CoreError> for LinkError {
    fn from(error: CoreError) -> Self {
        Self::Malformed(error.to_string())
    }
}
