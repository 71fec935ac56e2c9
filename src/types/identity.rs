// ABOUTME: Stack identity: a stack name scoped to a backend region.
// ABOUTME: Constructed once per invocation and never mutated.

use super::StackName;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegionError {
    #[error("region cannot be empty")]
    Empty,

    #[error("invalid character in region: '{0}'")]
    InvalidChar(char),
}

/// A backend region such as `us-east-1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Region(String);

impl Region {
    pub fn new(value: &str) -> Result<Self, RegionError> {
        if value.is_empty() {
            return Err(RegionError::Empty);
        }
        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
        {
            return Err(RegionError::InvalidChar(c));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Region {
    type Error = RegionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Region::new(&value)
    }
}

impl std::str::FromStr for Region {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::new(s)
    }
}

impl Default for Region {
    fn default() -> Self {
        Self("us-east-1".to_string())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a stack lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackIdentity {
    name: StackName,
    region: Region,
}

impl StackIdentity {
    pub fn new(name: StackName, region: Region) -> Self {
        Self { name, region }
    }

    pub fn name(&self) -> &StackName {
        &self.name
    }

    pub fn region(&self) -> &Region {
        &self.region
    }
}

impl fmt::Display for StackIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.region)
    }
}
