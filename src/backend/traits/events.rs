// ABOUTME: Stack event operations trait for orchestration backends.
// ABOUTME: Pages through a stack's event history, newest first.

use async_trait::async_trait;

use crate::backend::{BackendError, ContinuationToken, Page};
use crate::stack::StackEvent;

/// Event history access.
#[async_trait]
pub trait EventOps: Send + Sync {
    /// Fetch one page of events for a stack, newest first.
    async fn describe_stack_events(
        &self,
        stack: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<Page<StackEvent>, BackendError>;
}
