// ABOUTME: Observable phases of a deployment run and progress notifications.
// ABOUTME: The driver records every phase it enters, in order.

use serde::Serialize;
use std::fmt;

use super::DeployMode;

/// Where a deployment run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DeployPhase {
    NotStarted,
    Validating,
    Deciding,
    Submitting {
        mode: DeployMode,
        disable_rollback: bool,
    },
    Waiting,
    Succeeded,
    Failed,
    NoChange,
}

impl DeployPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DeployPhase::Succeeded | DeployPhase::Failed | DeployPhase::NoChange
        )
    }
}

impl fmt::Display for DeployPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployPhase::NotStarted => f.write_str("not started"),
            DeployPhase::Validating => f.write_str("validating"),
            DeployPhase::Deciding => f.write_str("deciding"),
            DeployPhase::Submitting { mode, .. } => write!(f, "submitting {mode}"),
            DeployPhase::Waiting => f.write_str("waiting"),
            DeployPhase::Succeeded => f.write_str("succeeded"),
            DeployPhase::Failed => f.write_str("failed"),
            DeployPhase::NoChange => f.write_str("no change"),
        }
    }
}

/// Notification sent to a driver observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The driver entered a new phase.
    Phase(DeployPhase),
    /// A parameter value was taken from the environment.
    ParameterOverridden(String),
}
