// ABOUTME: Stack descriptions and summaries returned by describe/list calls.
// ABOUTME: Serializes to the structured report printed after a deployment.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::StackStatus;
use crate::params::Parameter;
use crate::types::{Capability, StackId};

/// One entry of the stack listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSummary {
    pub name: String,
    pub id: StackId,
    pub status: StackStatus,
}

/// Full description of a stack at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackDescription {
    pub stack_name: String,
    pub stack_id: StackId,
    pub stack_status: StackStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_status_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
    pub parameters: Vec<Parameter>,
    pub outputs: Vec<StackOutput>,
    pub capabilities: Vec<Capability>,
    pub disable_rollback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackOutput {
    pub output_key: String,
    pub output_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
}
