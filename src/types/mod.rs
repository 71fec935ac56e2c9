// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Stack names, regions, capabilities and phantom-typed backend IDs.

mod capability;
mod id;
mod identity;
mod stack_name;

pub use capability::{Capability, UnknownCapability};
pub use id::{EventId, StackId};
pub use identity::{Region, RegionError, StackIdentity};
pub use stack_name::{StackName, StackNameError};
