// ABOUTME: Orchestration backend abstraction and its CloudFormation implementation.
// ABOUTME: Capability traits, pagination and backend error types.

mod aws;
mod error;
mod pagination;
pub mod traits;

pub use aws::CloudFormationBackend;
pub use error::{
    BackendError, BackendErrorKind, MalformedSnafu, RejectedSnafu, StackNotFoundSnafu,
    TransportSnafu,
};
pub use pagination::{ContinuationToken, Page, fetch_all};
pub use traits::{EventOps, FullBackend, StackOps, TemplateOps, TemplateSummary};
