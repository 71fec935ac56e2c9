// ABOUTME: Deduplicating stack event tailing with terminal status detection.
// ABOUTME: Pull-based tailer plus a futures Stream adapter for concurrent observation.

mod stream;
mod tailer;

pub use tailer::EventTailer;

use crate::deploy::DeploymentTerminal;
use crate::stack::StackEvent;

/// Where tailing starts in a stack's event history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAt {
    /// After every event that exists now.
    Latest,
    /// Offset from the current event count; negative values replay recent events.
    Relative(i64),
    /// After exactly this many events.
    Absolute(usize),
}

impl StartAt {
    /// `None` means latest, a negative offset counts back from the latest
    /// event, anything else is an absolute position.
    pub fn from_offset(offset: Option<i64>) -> Self {
        match offset {
            None => StartAt::Latest,
            Some(n) if n < 0 => StartAt::Relative(n),
            Some(n) => StartAt::Absolute(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }

    /// Initial watermark given the current number of events.
    pub(crate) fn watermark(self, count: usize) -> usize {
        match self {
            StartAt::Latest => count,
            StartAt::Relative(offset) => {
                let count = i64::try_from(count).unwrap_or(i64::MAX);
                usize::try_from(count.saturating_add(offset).max(0)).unwrap_or(0)
            }
            StartAt::Absolute(position) => position,
        }
    }

    fn needs_count(self) -> bool {
        !matches!(self, StartAt::Absolute(_))
    }
}

/// One item pulled from an [`EventTailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailItem {
    /// A newly observed event, in chronological order within its batch.
    Event(StackEvent),
    /// The stack reached a terminal status; the tailer is now closed.
    Terminal(DeploymentTerminal),
    /// Nothing more until the next poll interval.
    Pending,
}

/// Item of the stream produced by [`EventTailer::into_stream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailEvent {
    Event(StackEvent),
    Terminal(DeploymentTerminal),
}
