// ABOUTME: Final results of a deployment and terminal markers for the event stream.
// ABOUTME: Classifies a stack status into success or failure.

use serde::Serialize;
use std::fmt;

use crate::stack::{StackDescription, StackStatus, StatusClass};

/// How a deployment ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentOutcome {
    /// The stack reached the mode's success status; carries the final description.
    Succeeded(StackDescription),
    /// The stack reached some other terminal status.
    Failed {
        status: StackStatus,
        reason: Option<String>,
    },
    /// The backend reported nothing to update.
    NoChange,
}

impl DeploymentOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, DeploymentOutcome::Failed { .. })
    }
}

/// Terminal marker emitted once at the end of an event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "status", rename_all = "lowercase")]
pub enum DeploymentTerminal {
    Succeeded(StackStatus),
    Failed(StackStatus),
}

impl DeploymentTerminal {
    /// The terminal marker for `status`, or `None` while the stack is still changing.
    pub fn from_status(status: StackStatus) -> Option<Self> {
        match status.class() {
            StatusClass::InProgress => None,
            StatusClass::Succeeded => Some(DeploymentTerminal::Succeeded(status)),
            StatusClass::Failed => Some(DeploymentTerminal::Failed(status)),
        }
    }

    pub fn status(self) -> StackStatus {
        match self {
            DeploymentTerminal::Succeeded(status) | DeploymentTerminal::Failed(status) => status,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, DeploymentTerminal::Succeeded(_))
    }
}

impl fmt::Display for DeploymentTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentTerminal::Succeeded(status) => write!(f, "succeeded ({status})"),
            DeploymentTerminal::Failed(status) => write!(f, "failed ({status})"),
        }
    }
}
