// ABOUTME: Stack domain model as reported by the backend.
// ABOUTME: Statuses, events, descriptions and the registry used to look stacks up.

mod description;
mod event;
mod registry;
mod status;

pub use description::{StackDescription, StackOutput, StackSummary};
pub use event::StackEvent;
pub use registry::StackRegistry;
pub use status::{StackStatus, StatusClass, UnknownStatus};
