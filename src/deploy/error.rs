// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers template, parameter, lookup, timeout and backend failures.

use crate::backend::BackendError;
use crate::params::ParameterError;
use crate::stack::StackStatus;
use crate::template::TemplateError;

/// Errors that can occur during deployment state transitions.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// Template unreadable, rejected, or needing unacknowledged capabilities.
    #[error(transparent)]
    Template(TemplateError),

    /// Parameter file unusable.
    #[error(transparent)]
    Parameters(#[from] ParameterError),

    /// The stack disappeared while it was being tracked.
    #[error("stack not found: {0}")]
    NotFound(String),

    /// The stack did not reach a terminal status within the attempt bound.
    #[error(
        "timed out waiting for stack {stack} after {attempts} status checks (last status: {})",
        last_status_label(.last_status)
    )]
    Timeout {
        stack: String,
        attempts: u32,
        last_status: Option<StackStatus>,
    },

    /// Backend refused or could not process a call.
    #[error(transparent)]
    Backend(BackendError),
}

fn last_status_label(status: &Option<StackStatus>) -> &'static str {
    status.map_or("unknown", StackStatus::as_str)
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Template,
    Parameters,
    NotFound,
    Timeout,
    Backend,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Template(_) => DeployErrorKind::Template,
            DeployError::Parameters(_) => DeployErrorKind::Parameters,
            DeployError::NotFound(_) => DeployErrorKind::NotFound,
            DeployError::Timeout { .. } => DeployErrorKind::Timeout,
            DeployError::Backend(_) => DeployErrorKind::Backend,
        }
    }
}

impl From<BackendError> for DeployError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::StackNotFound { stack } => DeployError::NotFound(stack),
            other => DeployError::Backend(other),
        }
    }
}

impl From<TemplateError> for DeployError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::Backend(backend) => backend.into(),
            other => DeployError::Template(other),
        }
    }
}
