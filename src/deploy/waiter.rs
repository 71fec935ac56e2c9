// ABOUTME: Fixed-interval polling until a stack reaches a terminal status.
// ABOUTME: Bounded by an attempt count; cancelling the future only stops the local wait.

use std::time::Duration;

use crate::backend::StackOps;
use crate::stack::{StackDescription, StackRegistry, StackStatus};

use super::DeployError;

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl WaitPolicy {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Terminal observation made by the waiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitResult {
    /// The stack reached the target status.
    Reached(StackDescription),
    /// The stack stopped in another terminal status.
    Failed(StackDescription),
}

/// Poll `stack` until it is terminal.
///
/// Reaching `target` is success; any other terminal status is failure.
/// No sleep follows the final attempt.
///
/// # Errors
///
/// Returns `DeployError::Timeout` when `policy.max_attempts` checks pass
/// without a terminal status, or the describe error if a check fails.
pub async fn wait_for_status<B: StackOps>(
    backend: &B,
    stack: &str,
    target: StackStatus,
    policy: &WaitPolicy,
) -> Result<WaitResult, DeployError> {
    let registry = StackRegistry::new(backend);
    let mut last_status = None;

    for attempt in 1..=policy.max_attempts {
        let description = registry.describe(stack).await?;
        let status = description.stack_status;
        last_status = Some(status);

        if status == target {
            return Ok(WaitResult::Reached(description));
        }
        if status.is_terminal() {
            tracing::debug!(stack, %status, attempt, "stack stopped in unexpected status");
            return Ok(WaitResult::Failed(description));
        }

        tracing::trace!(stack, %status, attempt, "stack not ready");
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(DeployError::Timeout {
        stack: stack.to_string(),
        attempts: policy.max_attempts,
        last_status,
    })
}
