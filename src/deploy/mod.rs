// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Validate, decide create-or-update, submit once, then wait for a terminal status.

mod deployment;
mod driver;
mod error;
mod outcome;
mod phase;
mod request;
mod state;
mod transitions;
mod waiter;

pub use deployment::Deployment;
pub use driver::DeploymentDriver;
pub use error::{DeployError, DeployErrorKind};
pub use outcome::{DeploymentOutcome, DeploymentTerminal};
pub use phase::{DeployPhase, Progress};
pub use request::{DeployMode, DeploymentRequest};
pub use state::{Decided, NotStarted, Submitted, Validated};
pub use transitions::{NO_UPDATES_MESSAGE, Submission};
pub use waiter::{WaitPolicy, WaitResult, wait_for_status};
