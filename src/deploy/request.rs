// ABOUTME: The create-or-update request submitted to the backend.
// ABOUTME: Built once per invocation and never modified afterwards.

use serde::Serialize;
use std::fmt;

use crate::params::Parameter;
use crate::stack::StackStatus;
use crate::types::{Capability, StackName};

/// Whether the stack is being created or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    Create,
    Update,
}

impl DeployMode {
    /// Pick the mode from whether the stack already exists.
    pub fn for_existing(exists: bool) -> Self {
        if exists {
            DeployMode::Update
        } else {
            DeployMode::Create
        }
    }

    /// New stacks keep failed resources around for inspection.
    pub fn disable_rollback(self) -> bool {
        matches!(self, DeployMode::Create)
    }

    /// The only status that counts as success for this mode.
    pub fn success_status(self) -> StackStatus {
        match self {
            DeployMode::Create => StackStatus::CreateComplete,
            DeployMode::Update => StackStatus::UpdateComplete,
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployMode::Create => f.write_str("create"),
            DeployMode::Update => f.write_str("update"),
        }
    }
}

/// Everything the backend needs to create or update one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    stack_name: StackName,
    template_body: String,
    parameters: Vec<Parameter>,
    capabilities: Vec<Capability>,
    mode: DeployMode,
    disable_rollback: bool,
}

impl DeploymentRequest {
    pub fn new(
        stack_name: StackName,
        template_body: impl Into<String>,
        parameters: Vec<Parameter>,
        capabilities: Vec<Capability>,
        mode: DeployMode,
    ) -> Self {
        Self {
            stack_name,
            template_body: template_body.into(),
            parameters,
            capabilities,
            mode,
            disable_rollback: mode.disable_rollback(),
        }
    }

    pub fn stack_name(&self) -> &StackName {
        &self.stack_name
    }

    pub fn template_body(&self) -> &str {
        &self.template_body
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn mode(&self) -> DeployMode {
        self.mode
    }

    pub fn disable_rollback(&self) -> bool {
        self.disable_rollback
    }
}
