// ABOUTME: Stateful event tailer that never re-emits an event.
// ABOUTME: A private watermark counts the events already consumed.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{BackendError, EventOps, StackOps, fetch_all};
use crate::deploy::DeploymentTerminal;
use crate::stack::{StackEvent, StackRegistry, StackStatus};

use super::{StartAt, TailItem};

/// Pulls new events for one stack until it reaches a terminal status.
///
/// Each poll cycle reads the stack status and the full event history. Events
/// beyond the watermark are queued oldest first, then the status decides
/// whether a terminal item follows or the cycle ends with `Pending`. After a
/// terminal item or an error the tailer yields `None` forever.
pub struct EventTailer<B> {
    backend: Arc<B>,
    stack: String,
    pub(crate) interval: Duration,
    watermark: usize,
    last_status: Option<StackStatus>,
    buffer: VecDeque<StackEvent>,
    terminal: Option<DeploymentTerminal>,
    resting: bool,
    closed: bool,
}

impl<B: StackOps + EventOps> EventTailer<B> {
    /// Create a tailer positioned according to `start_at`.
    ///
    /// `StartAt::Absolute` makes no backend call, so it works for stacks that
    /// do not exist yet.
    ///
    /// # Errors
    ///
    /// Returns the backend error if the current events cannot be counted.
    pub async fn start(
        backend: Arc<B>,
        stack: impl Into<String>,
        start_at: StartAt,
        interval: Duration,
    ) -> Result<Self, BackendError> {
        let stack = stack.into();

        let count = if start_at.needs_count() {
            fetch_events(backend.as_ref(), &stack).await?.len()
        } else {
            0
        };
        let watermark = start_at.watermark(count);
        tracing::debug!(stack = %stack, watermark, "event tailer started");

        Ok(Self {
            backend,
            stack,
            interval,
            watermark,
            last_status: None,
            buffer: VecDeque::new(),
            terminal: None,
            resting: false,
            closed: false,
        })
    }

    /// Pull the next item, polling the backend when nothing is queued.
    pub async fn next(&mut self) -> Result<Option<TailItem>, BackendError> {
        loop {
            if self.closed {
                return Ok(None);
            }
            if let Some(event) = self.buffer.pop_front() {
                return Ok(Some(TailItem::Event(event)));
            }
            if let Some(terminal) = self.terminal.take() {
                self.closed = true;
                return Ok(Some(TailItem::Terminal(terminal)));
            }
            if self.resting {
                self.resting = false;
                return Ok(Some(TailItem::Pending));
            }

            if let Err(e) = self.poll().await {
                self.closed = true;
                return Err(e);
            }
        }
    }

    async fn poll(&mut self) -> Result<(), BackendError> {
        let status = StackRegistry::new(self.backend.as_ref())
            .describe(&self.stack)
            .await?
            .stack_status;
        let events = fetch_events(self.backend.as_ref(), &self.stack).await?;

        let count = events.len();
        if count > self.watermark {
            let fresh = count - self.watermark;
            self.buffer.extend(events.into_iter().take(fresh).rev());
            self.watermark = count;
        }

        self.last_status = Some(status);
        self.terminal = DeploymentTerminal::from_status(status);
        self.resting = self.terminal.is_none();

        tracing::trace!(
            stack = %self.stack,
            %status,
            queued = self.buffer.len(),
            watermark = self.watermark,
            "event poll"
        );
        Ok(())
    }
}

impl<B> EventTailer<B> {
    /// Number of events consumed so far; never decreases.
    pub fn watermark(&self) -> usize {
        self.watermark
    }

    /// Stack status seen by the most recent poll.
    pub fn last_status(&self) -> Option<StackStatus> {
        self.last_status
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

async fn fetch_events<B: EventOps>(backend: &B, stack: &str) -> Result<Vec<StackEvent>, BackendError> {
    fetch_all(|token| async move { backend.describe_stack_events(stack, token.as_ref()).await }).await
}
