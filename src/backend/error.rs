// ABOUTME: Backend error types with SNAFU pattern.
// ABOUTME: Separates backend rejections from transport failures for classification.

use snafu::Snafu;

/// Failure talking to the orchestration backend.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum BackendError {
    /// The backend answered and refused the request.
    #[snafu(display("{operation} rejected: {message}"))]
    Rejected {
        operation: &'static str,
        code: Option<String>,
        message: String,
    },

    /// The request did not produce a backend answer.
    #[snafu(display("{operation} failed: {message}"))]
    Transport {
        operation: &'static str,
        message: String,
    },

    #[snafu(display("stack does not exist: {stack}"))]
    StackNotFound { stack: String },

    #[snafu(display("{operation} returned an unexpected response: {detail}"))]
    Malformed {
        operation: &'static str,
        detail: String,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    Rejected,
    Transport,
    NotFound,
    Malformed,
}

impl BackendError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> BackendErrorKind {
        match self {
            BackendError::Rejected { .. } => BackendErrorKind::Rejected,
            BackendError::Transport { .. } => BackendErrorKind::Transport,
            BackendError::StackNotFound { .. } => BackendErrorKind::NotFound,
            BackendError::Malformed { .. } => BackendErrorKind::Malformed,
        }
    }

    /// The backend's own message, if the backend answered.
    pub fn message(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The backend's error code, if the backend answered with one.
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
