// ABOUTME: Stack operations trait for orchestration backends.
// ABOUTME: List, describe, create and update stacks.

use async_trait::async_trait;

use crate::backend::{BackendError, ContinuationToken, Page};
use crate::deploy::DeploymentRequest;
use crate::stack::{StackDescription, StackSummary};
use crate::types::StackId;

/// Stack lifecycle operations.
#[async_trait]
pub trait StackOps: Send + Sync {
    /// List one page of stacks, including recently deleted ones.
    async fn list_stacks(
        &self,
        token: Option<&ContinuationToken>,
    ) -> Result<Page<StackSummary>, BackendError>;

    /// Describe a stack by name or ID.
    async fn describe_stack(&self, stack: &str) -> Result<StackDescription, BackendError>;

    /// Submit a create request. Returns as soon as the backend accepts it.
    async fn create_stack(&self, request: &DeploymentRequest) -> Result<StackId, BackendError>;

    /// Submit an update request. Returns as soon as the backend accepts it.
    async fn update_stack(&self, request: &DeploymentRequest) -> Result<StackId, BackendError>;
}
