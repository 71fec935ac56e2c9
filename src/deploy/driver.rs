// ABOUTME: Top-level deployment state machine with an observable phase history.
// ABOUTME: Runs validate, decide, submit and wait, recording each phase entered.

use std::future::Future;
use std::pin::Pin;

use crate::backend::FullBackend;
use crate::params::{EnvSource, ParameterResolver, ProcessEnv};

use super::state::NotStarted;
use super::transitions::Submission;
use super::waiter::WaitPolicy;
use super::{DeployError, DeployPhase, Deployment, DeploymentOutcome, Progress};

type Observer<'a> = Box<dyn FnMut(&Progress) + Send + 'a>;
type Gate<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Drives one deployment from start to a terminal phase.
pub struct DeploymentDriver<'a, B, E = ProcessEnv> {
    backend: &'a B,
    resolver: ParameterResolver<E>,
    policy: WaitPolicy,
    history: Vec<DeployPhase>,
    observer: Option<Observer<'a>>,
    before_submit: Option<Gate<'a>>,
}

impl<'a, B: FullBackend, E: EnvSource> DeploymentDriver<'a, B, E> {
    pub fn new(backend: &'a B, resolver: ParameterResolver<E>, policy: WaitPolicy) -> Self {
        Self {
            backend,
            resolver,
            policy,
            history: vec![DeployPhase::NotStarted],
            observer: None,
            before_submit: None,
        }
    }

    /// Call `observer` for every phase change and parameter override.
    pub fn on_progress(mut self, observer: impl FnMut(&Progress) + Send + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Await `gate` once the stack has been validated and the create/update
    /// decision made, just before anything is submitted. Not awaited when the
    /// run fails earlier.
    pub fn before_submit(mut self, gate: impl Future<Output = ()> + Send + 'a) -> Self {
        self.before_submit = Some(Box::pin(gate));
        self
    }

    /// The phase most recently entered.
    pub fn phase(&self) -> DeployPhase {
        self.history
            .last()
            .copied()
            .unwrap_or(DeployPhase::NotStarted)
    }

    /// Every phase entered so far, starting with `NotStarted`.
    pub fn history(&self) -> &[DeployPhase] {
        &self.history
    }

    /// Run the deployment to completion.
    ///
    /// A failed stack operation is an `Ok(DeploymentOutcome::Failed)`; errors
    /// are reserved for problems that stopped the run itself.
    pub async fn run(
        &mut self,
        deployment: Deployment<NotStarted>,
    ) -> Result<DeploymentOutcome, DeployError> {
        let stack = deployment.identity().to_string();

        self.enter(&stack, DeployPhase::Validating);
        let validated = match deployment.validate(self.backend, &self.resolver).await {
            Ok(validated) => validated,
            Err(e) => return self.fail(&stack, e),
        };
        for key in validated.overridden() {
            self.notify(&Progress::ParameterOverridden(key.clone()));
        }

        self.enter(&stack, DeployPhase::Deciding);
        let decided = match validated.decide(self.backend).await {
            Ok(decided) => decided,
            Err(e) => return self.fail(&stack, e),
        };

        if let Some(gate) = self.before_submit.take() {
            gate.await;
        }

        let request = decided.request();
        self.enter(
            &stack,
            DeployPhase::Submitting {
                mode: request.mode(),
                disable_rollback: request.disable_rollback(),
            },
        );
        let submitted = match decided.submit(self.backend).await {
            Ok(Submission::Accepted(submitted)) => submitted,
            Ok(Submission::NoChange(_)) => {
                self.enter(&stack, DeployPhase::NoChange);
                return Ok(DeploymentOutcome::NoChange);
            }
            Err(e) => return self.fail(&stack, e),
        };

        self.enter(&stack, DeployPhase::Waiting);
        match submitted.wait(self.backend, &self.policy).await {
            Ok(outcome @ DeploymentOutcome::Succeeded(_)) => {
                self.enter(&stack, DeployPhase::Succeeded);
                Ok(outcome)
            }
            Ok(outcome) => {
                self.enter(&stack, DeployPhase::Failed);
                Ok(outcome)
            }
            Err(e) => self.fail(&stack, e),
        }
    }

    fn enter(&mut self, stack: &str, phase: DeployPhase) {
        tracing::info!(stack, %phase, "deployment phase");
        self.history.push(phase);
        self.notify(&Progress::Phase(phase));
    }

    fn fail<T>(&mut self, stack: &str, err: DeployError) -> Result<T, DeployError> {
        tracing::warn!(stack, error = %err, "deployment failed");
        self.enter(stack, DeployPhase::Failed);
        Err(err)
    }

    fn notify(&mut self, progress: &Progress) {
        if let Some(observer) = self.observer.as_mut() {
            observer(progress);
        }
    }
}
