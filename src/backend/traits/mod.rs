// ABOUTME: Composable capability traits for orchestration backends.
// ABOUTME: Defines StackOps, EventOps, TemplateOps and the FullBackend bundle.

mod events;
mod stack;
mod template;

pub use events::EventOps;
pub use stack::StackOps;
pub use template::{TemplateOps, TemplateSummary};

/// A backend offering every capability the deployment workflow needs.
///
/// Automatically implemented for any type implementing all capability traits.
pub trait FullBackend: StackOps + EventOps + TemplateOps {}

impl<T: StackOps + EventOps + TemplateOps> FullBackend for T {}
