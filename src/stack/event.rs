// ABOUTME: A single stack event: one resource changing status.
// ABOUTME: Fixed-field record converted from the backend's event listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::types::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StackEvent {
    pub event_id: EventId,
    pub resource_type: String,
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_status: String,
    pub resource_status_reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl fmt::Display for StackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:<28} {:<40} {}",
            self.timestamp.format("%Y-%m-%dT%H:%M:%SZ"),
            self.resource_status,
            self.resource_type,
            self.logical_resource_id
        )?;
        if let Some(reason) = &self.resource_status_reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}
