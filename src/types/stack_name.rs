// ABOUTME: Backend-compatible stack name validation.
// ABOUTME: Names start with a letter and contain only ASCII alphanumerics and hyphens.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackNameError {
    #[error("stack name cannot be empty")]
    Empty,

    #[error("stack name exceeds maximum length of 128 characters")]
    TooLong,

    #[error("stack name must start with a letter")]
    MustStartWithLetter,

    #[error("invalid character in stack name: '{0}'")]
    InvalidChar(char),
}

/// A stack name, unique within a region. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackName(String);

impl StackName {
    pub fn new(value: &str) -> Result<Self, StackNameError> {
        let first = value.chars().next().ok_or(StackNameError::Empty)?;

        if value.len() > MAX_LEN {
            return Err(StackNameError::TooLong);
        }

        if !first.is_ascii_alphabetic() {
            return Err(StackNameError::MustStartWithLetter);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Err(StackNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StackName {
    type Err = StackNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for StackName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for StackName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StackName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        StackName::new(&s).map_err(serde::de::Error::custom)
    }
}
