// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::backend::{StackOps, TemplateOps};
use crate::params::{EnvSource, ParameterResolver};
use crate::stack::StackRegistry;
use crate::template::TemplateValidator;

use super::error::DeployError;
use super::state::{Decided, NotStarted, Submitted, Validated};
use super::waiter::{WaitPolicy, WaitResult, wait_for_status};
use super::{DeployMode, Deployment, DeploymentOutcome, DeploymentRequest};

/// Backend message for an update that would change nothing.
pub const NO_UPDATES_MESSAGE: &str = "No updates are to be performed.";

/// Result of submitting a decided deployment.
#[derive(Debug)]
pub enum Submission {
    /// The backend accepted the request and is now working on it.
    Accepted(Deployment<Submitted>),
    /// The backend reported there was nothing to change.
    NoChange(Deployment<Decided>),
}

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            identity: self.identity,
            template: self.template,
            capabilities: self.capabilities,
            state,
        }
    }
}

// =============================================================================
// NotStarted -> Validated
// =============================================================================

impl Deployment<NotStarted> {
    /// Validate the template with the backend, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Template` if the backend rejects the template or
    /// it needs a capability that was not granted.
    #[must_use = "deployment state must be used"]
    pub async fn validate<B: TemplateOps, E: EnvSource>(
        self,
        backend: &B,
        resolver: &ParameterResolver<E>,
    ) -> Result<Deployment<Validated>, DeployError> {
        let summary = TemplateValidator::new(backend, &self.capabilities)
            .validate(&self.template)
            .await?;

        let resolved = resolver.resolve(self.state.parameters.clone());

        let undeclared: Vec<_> = resolved
            .parameters
            .iter()
            .filter(|p| !summary.declared_parameters.contains(&p.key))
            .map(|p| p.key.as_str())
            .collect();
        if !summary.declared_parameters.is_empty() && !undeclared.is_empty() {
            tracing::warn!(
                stack = %self.identity,
                "parameters not declared by template: {}",
                undeclared.join(", ")
            );
        }

        Ok(self.transition(Validated {
            summary,
            parameters: resolved.parameters,
            overridden: resolved.overridden,
        }))
    }
}

// =============================================================================
// Validated -> Decided
// =============================================================================

impl Deployment<Validated> {
    /// Choose create or update from whether the stack exists.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Backend` if the stack listing fails.
    #[must_use = "deployment state must be used"]
    pub async fn decide<B: StackOps>(self, backend: &B) -> Result<Deployment<Decided>, DeployError> {
        let exists = StackRegistry::new(backend).exists(self.stack_name()).await?;
        let mode = DeployMode::for_existing(exists);

        let request = DeploymentRequest::new(
            self.stack_name().clone(),
            self.template.body(),
            self.state.parameters.clone(),
            self.capabilities.clone(),
            mode,
        );

        tracing::debug!(stack = %self.identity, %mode, "deployment mode chosen");
        Ok(self.transition(Decided { request }))
    }
}

// =============================================================================
// Decided -> Submitted
// =============================================================================

impl Deployment<Decided> {
    pub fn mode(&self) -> DeployMode {
        self.state.request.mode()
    }

    /// Submit the request exactly once.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Backend` for any refusal other than "no updates".
    #[must_use = "submission result must be used"]
    pub async fn submit<B: StackOps>(self, backend: &B) -> Result<Submission, DeployError> {
        let request = &self.state.request;
        let result = match request.mode() {
            DeployMode::Create => backend.create_stack(request).await,
            DeployMode::Update => backend.update_stack(request).await,
        };

        match result {
            Ok(stack_id) => {
                tracing::info!(stack = %self.identity, %stack_id, "submission accepted");
                let request = self.state.request.clone();
                Ok(Submission::Accepted(
                    self.transition(Submitted { request, stack_id }),
                ))
            }
            Err(e) if e.message() == Some(NO_UPDATES_MESSAGE) => {
                tracing::info!(stack = %self.identity, "no updates to perform");
                Ok(Submission::NoChange(self))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Submitted -> outcome
// =============================================================================

impl Deployment<Submitted> {
    /// Block until the stack reaches a terminal status.
    ///
    /// On success the final description is fetched again by stack ID.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Timeout` if the attempt bound runs out and
    /// `DeployError::NotFound` if the stack vanishes.
    pub async fn wait<B: StackOps>(
        self,
        backend: &B,
        policy: &WaitPolicy,
    ) -> Result<DeploymentOutcome, DeployError> {
        let stack_id = self.state.stack_id.as_str();
        let target = self.state.request.mode().success_status();

        match wait_for_status(backend, stack_id, target, policy).await? {
            WaitResult::Reached(_) => {
                let description = StackRegistry::new(backend).describe(stack_id).await?;
                Ok(DeploymentOutcome::Succeeded(description))
            }
            WaitResult::Failed(description) => Ok(DeploymentOutcome::Failed {
                status: description.stack_status,
                reason: description.stack_status_reason,
            }),
        }
    }
}
