// ABOUTME: Non-fatal problems met while following stack events.
// ABOUTME: Each issue records how far the event stream got before it stopped.

use std::fmt;
use std::time::Duration;

use crate::backend::{BackendError, BackendErrorKind};

/// Why the events shown to the user are incomplete.
///
/// None of these change the deployment outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailIssue {
    /// The tailer could not be positioned, so no events were followed.
    Unpositioned {
        kind: BackendErrorKind,
        detail: String,
    },
    /// A poll failed after `shown` events had been printed.
    PollFailed {
        shown: usize,
        kind: BackendErrorKind,
        detail: String,
    },
    /// The stream closed without reporting a terminal status.
    EndedEarly { shown: usize },
    /// The drain period ran out before the terminal status arrived.
    DrainExpired { shown: usize, drain: Duration },
    /// The tail task died.
    TaskAborted(String),
}

impl TailIssue {
    pub fn unpositioned(err: &BackendError) -> Self {
        TailIssue::Unpositioned {
            kind: err.kind(),
            detail: err.to_string(),
        }
    }

    pub fn poll_failed(shown: usize, err: &BackendError) -> Self {
        TailIssue::PollFailed {
            shown,
            kind: err.kind(),
            detail: err.to_string(),
        }
    }

    /// The backend error behind the issue, if one was involved.
    pub fn backend_kind(&self) -> Option<BackendErrorKind> {
        match self {
            TailIssue::Unpositioned { kind, .. } | TailIssue::PollFailed { kind, .. } => {
                Some(*kind)
            }
            _ => None,
        }
    }

    /// Events printed before the stream stopped.
    pub fn events_shown(&self) -> usize {
        match self {
            TailIssue::PollFailed { shown, .. }
            | TailIssue::EndedEarly { shown }
            | TailIssue::DrainExpired { shown, .. } => *shown,
            TailIssue::Unpositioned { .. } | TailIssue::TaskAborted(_) => 0,
        }
    }
}

impl fmt::Display for TailIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TailIssue::Unpositioned { detail, .. } => write!(f, "not following events: {detail}"),
            TailIssue::PollFailed { shown, detail, .. } => {
                write!(f, "event stream failed after {shown} events: {detail}")
            }
            TailIssue::EndedEarly { shown } => write!(
                f,
                "event stream ended after {shown} events without a final status"
            ),
            TailIssue::DrainExpired { shown, drain } => write!(
                f,
                "stopped following events after {}s ({shown} events shown)",
                drain.as_secs()
            ),
            TailIssue::TaskAborted(detail) => write!(f, "event task failed: {detail}"),
        }
    }
}
