// ABOUTME: Stack lifecycle statuses and their terminal classification.
// ABOUTME: Every status is exactly one of in-progress, succeeded or failed.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown stack status: {0}")]
pub struct UnknownStatus(pub String);

/// Status of a stack as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackStatus {
    CreateInProgress,
    CreateFailed,
    CreateComplete,
    RollbackInProgress,
    RollbackFailed,
    RollbackComplete,
    DeleteInProgress,
    DeleteFailed,
    DeleteComplete,
    UpdateInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateCompleteCleanupInProgress,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackComplete,
    UpdateRollbackCompleteCleanupInProgress,
    ReviewInProgress,
    ImportInProgress,
    ImportComplete,
    ImportRollbackInProgress,
    ImportRollbackFailed,
    ImportRollbackComplete,
}

/// Where a status sits in the lifecycle of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// The backend is still working; more transitions will follow.
    InProgress,
    /// The operation finished and the stack is usable.
    Succeeded,
    /// The operation finished unsuccessfully (including completed rollbacks).
    Failed,
}

impl StackStatus {
    pub const ALL: [StackStatus; 23] = [
        StackStatus::CreateInProgress,
        StackStatus::CreateFailed,
        StackStatus::CreateComplete,
        StackStatus::RollbackInProgress,
        StackStatus::RollbackFailed,
        StackStatus::RollbackComplete,
        StackStatus::DeleteInProgress,
        StackStatus::DeleteFailed,
        StackStatus::DeleteComplete,
        StackStatus::UpdateInProgress,
        StackStatus::UpdateComplete,
        StackStatus::UpdateFailed,
        StackStatus::UpdateCompleteCleanupInProgress,
        StackStatus::UpdateRollbackInProgress,
        StackStatus::UpdateRollbackFailed,
        StackStatus::UpdateRollbackComplete,
        StackStatus::UpdateRollbackCompleteCleanupInProgress,
        StackStatus::ReviewInProgress,
        StackStatus::ImportInProgress,
        StackStatus::ImportComplete,
        StackStatus::ImportRollbackInProgress,
        StackStatus::ImportRollbackFailed,
        StackStatus::ImportRollbackComplete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StackStatus::CreateInProgress => "CREATE_IN_PROGRESS",
            StackStatus::CreateFailed => "CREATE_FAILED",
            StackStatus::CreateComplete => "CREATE_COMPLETE",
            StackStatus::RollbackInProgress => "ROLLBACK_IN_PROGRESS",
            StackStatus::RollbackFailed => "ROLLBACK_FAILED",
            StackStatus::RollbackComplete => "ROLLBACK_COMPLETE",
            StackStatus::DeleteInProgress => "DELETE_IN_PROGRESS",
            StackStatus::DeleteFailed => "DELETE_FAILED",
            StackStatus::DeleteComplete => "DELETE_COMPLETE",
            StackStatus::UpdateInProgress => "UPDATE_IN_PROGRESS",
            StackStatus::UpdateComplete => "UPDATE_COMPLETE",
            StackStatus::UpdateFailed => "UPDATE_FAILED",
            StackStatus::UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
            StackStatus::UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
            StackStatus::UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
            StackStatus::UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
            StackStatus::UpdateRollbackCompleteCleanupInProgress => {
                "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS"
            }
            StackStatus::ReviewInProgress => "REVIEW_IN_PROGRESS",
            StackStatus::ImportInProgress => "IMPORT_IN_PROGRESS",
            StackStatus::ImportComplete => "IMPORT_COMPLETE",
            StackStatus::ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
            StackStatus::ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
            StackStatus::ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
        }
    }

    /// Classify the status.
    ///
    /// Completed rollbacks are failures even though they end in `_COMPLETE`:
    /// the operation that was requested did not take effect.
    pub fn class(self) -> StatusClass {
        let name = self.as_str();
        let rolled_back = matches!(
            self,
            StackStatus::RollbackComplete
                | StackStatus::UpdateRollbackComplete
                | StackStatus::ImportRollbackComplete
        );

        if name.ends_with("_FAILED") || rolled_back {
            StatusClass::Failed
        } else if name.ends_with("_COMPLETE") {
            StatusClass::Succeeded
        } else {
            StatusClass::InProgress
        }
    }

    pub fn is_terminal(self) -> bool {
        self.class() != StatusClass::InProgress
    }
}

impl FromStr for StackStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StackStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StackStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_round_trips_through_its_name() {
        for status in StackStatus::ALL {
            assert_eq!(status.as_str().parse::<StackStatus>(), Ok(status));
        }
    }

    #[test]
    fn failed_suffix_is_failure_terminal() {
        for status in StackStatus::ALL {
            if status.as_str().ends_with("_FAILED") {
                assert_eq!(status.class(), StatusClass::Failed, "{status}");
            }
        }
    }

    #[test]
    fn update_failed_is_a_known_failure() {
        assert_eq!(
            "UPDATE_FAILED".parse::<StackStatus>(),
            Ok(StackStatus::UpdateFailed)
        );
        assert_eq!(StackStatus::UpdateFailed.class(), StatusClass::Failed);
    }

    #[test]
    fn completed_rollbacks_are_failures() {
        assert_eq!(StackStatus::RollbackComplete.class(), StatusClass::Failed);
        assert_eq!(
            StackStatus::UpdateRollbackComplete.class(),
            StatusClass::Failed
        );
    }

    #[test]
    fn completions_are_successes() {
        assert_eq!(StackStatus::CreateComplete.class(), StatusClass::Succeeded);
        assert_eq!(StackStatus::UpdateComplete.class(), StatusClass::Succeeded);
        assert_eq!(StackStatus::DeleteComplete.class(), StatusClass::Succeeded);
    }

    #[test]
    fn cleanup_phases_are_not_terminal() {
        assert!(!StackStatus::UpdateCompleteCleanupInProgress.is_terminal());
        assert!(!StackStatus::UpdateRollbackCompleteCleanupInProgress.is_terminal());
        assert!(!StackStatus::CreateInProgress.is_terminal());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(
            "SLEEPING".parse::<StackStatus>(),
            Err(UnknownStatus("SLEEPING".to_string()))
        );
    }
}
