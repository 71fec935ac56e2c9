// ABOUTME: Capability acknowledgements a deployment grants the backend.
// ABOUTME: Parsed from and rendered as the backend's CAPABILITY_* strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown capability: {0}")]
pub struct UnknownCapability(pub String);

/// A capability the operator acknowledges when submitting a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Capability {
    Iam,
    NamedIam,
    AutoExpand,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
            Capability::AutoExpand => "CAPABILITY_AUTO_EXPAND",
        }
    }

    /// Capabilities granted when nothing is configured.
    pub fn defaults() -> Vec<Capability> {
        vec![Capability::NamedIam, Capability::AutoExpand]
    }

    /// Whether granting `self` also satisfies a template requiring `required`.
    /// Named IAM acknowledgement covers plain IAM resources.
    pub fn covers(self, required: Capability) -> bool {
        self == required || (self == Capability::NamedIam && required == Capability::Iam)
    }
}

impl FromStr for Capability {
    type Err = UnknownCapability;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CAPABILITY_IAM" => Ok(Capability::Iam),
            "CAPABILITY_NAMED_IAM" => Ok(Capability::NamedIam),
            "CAPABILITY_AUTO_EXPAND" => Ok(Capability::AutoExpand),
            other => Err(UnknownCapability(other.to_string())),
        }
    }
}

impl TryFrom<String> for Capability {
    type Error = UnknownCapability;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
