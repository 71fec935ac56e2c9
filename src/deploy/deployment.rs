// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::backend::TemplateSummary;
use crate::params::{Parameter, ParameterSet};
use crate::template::Template;
use crate::types::{Capability, StackId, StackIdentity, StackName};

use super::DeploymentRequest;
use super::state::{Decided, NotStarted, Submitted, Validated};

/// A deployment in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (like the final
/// request or the stack ID) directly in the state type, so a request can only
/// be submitted after it was decided and only a submitted stack can be waited on.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) identity: StackIdentity,
    pub(crate) template: Template,
    pub(crate) capabilities: Vec<Capability>,
    pub(crate) state: S,
}

impl Deployment<NotStarted> {
    /// Create a deployment for one stack.
    pub fn new(
        identity: StackIdentity,
        template: Template,
        capabilities: Vec<Capability>,
        parameters: ParameterSet,
    ) -> Self {
        Deployment {
            identity,
            template,
            capabilities,
            state: NotStarted { parameters },
        }
    }

    /// Parameters as read from the file, before environment overrides.
    pub fn parameters(&self) -> &ParameterSet {
        &self.state.parameters
    }
}

impl<S> Deployment<S> {
    pub fn identity(&self) -> &StackIdentity {
        &self.identity
    }

    pub fn stack_name(&self) -> &StackName {
        self.identity.name()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Capabilities acknowledged on submission.
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }
}

impl Deployment<Validated> {
    pub fn summary(&self) -> &TemplateSummary {
        &self.state.summary
    }

    /// Parameters after environment overrides.
    pub fn parameters(&self) -> &[Parameter] {
        &self.state.parameters
    }

    /// Keys whose value came from the environment.
    pub fn overridden(&self) -> &[String] {
        &self.state.overridden
    }
}

impl Deployment<Decided> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.state.request
    }
}

impl Deployment<Submitted> {
    pub fn request(&self) -> &DeploymentRequest {
        &self.state.request
    }

    pub fn stack_id(&self) -> &StackId {
        &self.state.stack_id
    }
}
