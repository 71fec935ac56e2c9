// ABOUTME: Template validation trait for orchestration backends.
// ABOUTME: Backend-side syntax check returning what the template declares.

use async_trait::async_trait;

use crate::backend::BackendError;
use crate::types::Capability;

/// Template checks performed by the backend without touching any stack.
#[async_trait]
pub trait TemplateOps: Send + Sync {
    /// Validate a template body.
    ///
    /// A template the backend refuses is reported as `BackendError::Rejected`.
    async fn validate_template(&self, body: &str) -> Result<TemplateSummary, BackendError>;
}

/// What the backend learned from a valid template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSummary {
    pub description: Option<String>,
    /// Capabilities that must be acknowledged to deploy this template.
    pub required_capabilities: Vec<Capability>,
    /// Parameter keys the template declares.
    pub declared_parameters: Vec<String>,
}
