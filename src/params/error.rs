// ABOUTME: Error types for parameter loading.
// ABOUTME: Covers unreadable files, malformed records and duplicate keys.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("failed to read parameters from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameters file: {0}")]
    Parse(String),

    #[error("parameter record must name exactly one key, found {0}")]
    AmbiguousRecord(usize),

    #[error("long-form parameter record has no ParameterKey")]
    MissingKey,

    #[error("parameter {0} has no ParameterValue")]
    MissingValue(String),

    #[error("parameter {key}: field {field} is not supported")]
    UnsupportedField { key: String, field: String },

    #[error("parameter key cannot be empty")]
    EmptyKey,

    #[error("duplicate parameter key: {0}")]
    DuplicateKey(String),
}

impl From<serde_json::Error> for ParameterError {
    fn from(err: serde_json::Error) -> Self {
        ParameterError::Parse(err.to_string())
    }
}

impl From<serde_yaml::Error> for ParameterError {
    fn from(err: serde_yaml::Error) -> Self {
        ParameterError::Parse(err.to_string())
    }
}
