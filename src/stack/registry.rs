// ABOUTME: Existence and status lookups for named stacks.
// ABOUTME: Lists through every page so large accounts are handled.

use crate::backend::{BackendError, StackOps, fetch_all};
use crate::types::StackName;

use super::{StackDescription, StackStatus, StackSummary};

/// Read-only view of the stacks known to a backend.
pub struct StackRegistry<'a, B> {
    backend: &'a B,
}

impl<'a, B: StackOps> StackRegistry<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Every stack the backend lists, across all pages.
    pub async fn list(&self) -> Result<Vec<StackSummary>, BackendError> {
        let backend = self.backend;
        fetch_all(|token| async move { backend.list_stacks(token.as_ref()).await }).await
    }

    /// Whether a live stack named exactly `name` exists.
    ///
    /// Deleted stacks stay in the listing for a while; they do not count.
    pub async fn exists(&self, name: &StackName) -> Result<bool, BackendError> {
        let stacks = self.list().await?;
        let found = stacks
            .iter()
            .filter(|s| s.status != StackStatus::DeleteComplete)
            .any(|s| s.name == name.as_str());

        tracing::debug!(stack = %name, found, listed = stacks.len(), "checked stack existence");
        Ok(found)
    }

    /// Describe a stack by name or ID.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::StackNotFound` if no such stack exists.
    pub async fn describe(&self, stack: &str) -> Result<StackDescription, BackendError> {
        self.backend.describe_stack(stack).await
    }
}
