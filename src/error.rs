// ABOUTME: Application-wide error types for stackdeploy.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::backend::BackendError;
use crate::deploy::DeployError;
use crate::params::ParameterError;
use crate::stack::StackStatus;
use crate::template::TemplateError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Parameters(#[from] ParameterError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("deployment of {stack} failed with status {status}{}", reason_suffix(.reason))]
    DeploymentFailed {
        stack: String,
        status: StackStatus,
        reason: Option<String>,
    },

    #[error("interrupted while deploying {stack}; the backend operation continues")]
    Interrupted { stack: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, Error>;
