// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: State types carry the data that exists once that state is reached.

use crate::backend::TemplateSummary;
use crate::params::{Parameter, ParameterSet};
use crate::types::StackId;

use super::DeploymentRequest;

/// Initial state: template and parameter file loaded.
/// Available actions: `validate()`
#[derive(Debug, Clone)]
pub struct NotStarted {
    pub(crate) parameters: ParameterSet,
}

/// Template accepted by the backend and parameters resolved.
/// Available actions: `decide()`
#[derive(Debug, Clone)]
pub struct Validated {
    pub(crate) summary: TemplateSummary,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) overridden: Vec<String>,
}

/// Create or update chosen; the request is final.
/// Available actions: `submit()`
#[derive(Debug, Clone)]
pub struct Decided {
    pub(crate) request: DeploymentRequest,
}

/// Request accepted by the backend.
/// Available actions: `wait()`
#[derive(Debug, Clone)]
pub struct Submitted {
    pub(crate) request: DeploymentRequest,
    pub(crate) stack_id: StackId,
}
