// ABOUTME: Template parameters: loading from JSON or YAML files and env overrides.
// ABOUTME: Keeps file order and rejects duplicate keys.

mod error;
mod file;
mod resolver;

pub use error::ParameterError;
pub use file::ParameterSet;
pub use resolver::{EnvSource, ParameterResolver, ProcessEnv, ResolvedParameters};

use serde::Serialize;

/// A named template input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    #[serde(rename = "ParameterKey")]
    pub key: String,
    #[serde(rename = "ParameterValue")]
    pub value: String,
}

impl Parameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
