// ABOUTME: Integration tests for the deployment driver and type-state transitions.
// ABOUTME: Covers mode selection, no-change handling, failures, timeouts and the phase path.

mod support;

use stackdeploy::deploy::{
    DeployErrorKind, DeployMode, DeployPhase, Deployment, DeploymentDriver, DeploymentOutcome,
    NotStarted, Progress, Submission, WaitPolicy,
};
use stackdeploy::params::{Parameter, ParameterResolver, ParameterSet};
use stackdeploy::stack::StackStatus;
use stackdeploy::template::Template;
use stackdeploy::types::{Capability, Region, StackIdentity, StackName};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use support::{FakeBackend, Tick};

fn fast_policy(max_attempts: u32) -> WaitPolicy {
    WaitPolicy {
        interval: Duration::from_millis(1),
        max_attempts,
    }
}

fn deployment(name: &str, parameters: Vec<Parameter>) -> Deployment<NotStarted> {
    Deployment::new(
        StackIdentity::new(StackName::new(name).unwrap(), Region::default()),
        Template::from_body(r#"{"Resources": {}}"#),
        Capability::defaults(),
        ParameterSet::new(parameters).unwrap(),
    )
}

fn no_env() -> ParameterResolver<HashMap<String, String>> {
    ParameterResolver::new(HashMap::new())
}

mod mode_selection {
    use super::*;

    #[tokio::test]
    async fn fresh_stack_is_created_without_rollback() {
        support::init_tracing();
        let backend = FakeBackend::new("demo").with_ticks(vec![
            Tick::status(StackStatus::CreateInProgress),
            Tick::status(StackStatus::CreateComplete),
        ]);

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let outcome = driver.run(deployment("demo", vec![])).await.unwrap();

        assert!(matches!(outcome, DeploymentOutcome::Succeeded(ref d) if d.stack_status == StackStatus::CreateComplete));
        let created = backend.created();
        assert_eq!(created.len(), 1);
        assert!(backend.updated().is_empty());
        assert_eq!(created[0].mode(), DeployMode::Create);
        assert!(created[0].disable_rollback());
        assert_eq!(created[0].capabilities(), Capability::defaults().as_slice());
    }

    #[tokio::test]
    async fn existing_stack_is_updated_with_rollback() {
        let backend = FakeBackend::new("demo")
            .existing(StackStatus::CreateComplete)
            .with_ticks(vec![
                Tick::status(StackStatus::UpdateInProgress),
                Tick::status(StackStatus::UpdateCompleteCleanupInProgress),
                Tick::status(StackStatus::UpdateComplete),
            ]);

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let outcome = driver.run(deployment("demo", vec![])).await.unwrap();

        assert!(matches!(outcome, DeploymentOutcome::Succeeded(_)));
        let updated = backend.updated();
        assert_eq!(updated.len(), 1);
        assert!(backend.created().is_empty());
        assert!(!updated[0].disable_rollback());
        assert_eq!(
            driver.history()[3],
            DeployPhase::Submitting {
                mode: DeployMode::Update,
                disable_rollback: false
            }
        );
    }

    #[tokio::test]
    async fn deleted_stack_with_same_name_is_recreated() {
        let backend = FakeBackend::new("demo")
            .with_listed("demo", StackStatus::DeleteComplete)
            .with_ticks(vec![Tick::status(StackStatus::CreateComplete)]);

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        driver.run(deployment("demo", vec![])).await.unwrap();

        assert_eq!(backend.created().len(), 1);
    }
}

mod no_change {
    use super::*;

    #[tokio::test]
    async fn no_updates_message_is_not_an_error() {
        let backend = FakeBackend::new("demo")
            .existing(StackStatus::UpdateComplete)
            .with_submit_error("ValidationError", "No updates are to be performed.");

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let outcome = driver.run(deployment("demo", vec![])).await.unwrap();

        assert_eq!(outcome, DeploymentOutcome::NoChange);
        assert_eq!(driver.phase(), DeployPhase::NoChange);
        assert_eq!(backend.describe_calls(), 0);
    }

    #[tokio::test]
    async fn other_submission_errors_fail() {
        let backend = FakeBackend::new("demo")
            .existing(StackStatus::UpdateComplete)
            .with_submit_error("ValidationError", "Stack is in UPDATE_IN_PROGRESS state");

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let err = driver.run(deployment("demo", vec![])).await.unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::Backend);
        assert_eq!(driver.phase(), DeployPhase::Failed);
    }

    #[tokio::test]
    async fn message_must_match_exactly() {
        let backend = FakeBackend::new("demo")
            .existing(StackStatus::UpdateComplete)
            .with_submit_error("ValidationError", "No updates are to be performed");

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        assert!(driver.run(deployment("demo", vec![])).await.is_err());
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn rejected_template_fails_before_registry_lookup() {
        let backend = FakeBackend::new("demo").with_validation_error("Template format error");

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let err = driver.run(deployment("demo", vec![])).await.unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::Template);
        assert_eq!(backend.list_calls(), 0);
        assert!(backend.created().is_empty());
        assert_eq!(
            driver.history(),
            &[
                DeployPhase::NotStarted,
                DeployPhase::Validating,
                DeployPhase::Failed
            ]
        );
    }

    #[tokio::test]
    async fn unacknowledged_capability_fails() {
        let backend = FakeBackend::new("demo").with_required_capabilities(vec![Capability::Iam]);
        let deployment = Deployment::new(
            StackIdentity::new(StackName::new("demo").unwrap(), Region::default()),
            Template::from_body("{}"),
            vec![Capability::AutoExpand],
            ParameterSet::default(),
        );

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let err = driver.run(deployment).await.unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::Template);
        assert_eq!(backend.list_calls(), 0);
    }
}

mod waiting {
    use super::*;

    #[tokio::test]
    async fn create_failure_reports_status_and_reason() {
        let backend = FakeBackend::new("demo").with_ticks(vec![
            Tick::status(StackStatus::CreateInProgress),
            Tick::status(StackStatus::CreateFailed),
        ]);

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let outcome = driver.run(deployment("demo", vec![])).await.unwrap();

        assert_eq!(
            outcome,
            DeploymentOutcome::Failed {
                status: StackStatus::CreateFailed,
                reason: Some("reached CREATE_FAILED".to_string()),
            }
        );
        assert_eq!(driver.phase(), DeployPhase::Failed);
    }

    #[tokio::test]
    async fn update_rollback_is_failure() {
        let backend = FakeBackend::new("demo")
            .existing(StackStatus::UpdateComplete)
            .with_ticks(vec![
                Tick::status(StackStatus::UpdateInProgress),
                Tick::status(StackStatus::UpdateRollbackInProgress),
                Tick::status(StackStatus::UpdateRollbackComplete),
            ]);

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5));
        let outcome = driver.run(deployment("demo", vec![])).await.unwrap();

        assert!(matches!(
            outcome,
            DeploymentOutcome::Failed {
                status: StackStatus::UpdateRollbackComplete,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn attempt_bound_times_out() {
        let backend =
            FakeBackend::new("demo").with_ticks(vec![Tick::status(StackStatus::CreateInProgress)]);

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(3));
        let err = driver.run(deployment("demo", vec![])).await.unwrap_err();

        assert_eq!(err.kind(), DeployErrorKind::Timeout);
        assert!(err.to_string().contains("after 3 status checks"));
        assert!(err.to_string().contains("CREATE_IN_PROGRESS"));
        assert_eq!(backend.describe_calls(), 3);
        assert_eq!(driver.phase(), DeployPhase::Failed);
    }
}

mod phases {
    use super::*;

    #[tokio::test]
    async fn fresh_demo_stack_walks_every_phase() {
        let backend = FakeBackend::new("demo").with_ticks(vec![
            Tick::status(StackStatus::CreateInProgress),
            Tick::status(StackStatus::CreateComplete),
        ]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5))
            .on_progress(move |progress| sink.lock().unwrap().push(progress.clone()));
        driver.run(deployment("demo", vec![])).await.unwrap();

        let expected = vec![
            DeployPhase::NotStarted,
            DeployPhase::Validating,
            DeployPhase::Deciding,
            DeployPhase::Submitting {
                mode: DeployMode::Create,
                disable_rollback: true,
            },
            DeployPhase::Waiting,
            DeployPhase::Succeeded,
        ];
        assert_eq!(driver.history(), expected.as_slice());

        let observed: Vec<_> = seen
            .lock()
            .unwrap()
            .iter()
            .filter_map(|p| match p {
                Progress::Phase(phase) => Some(*phase),
                Progress::ParameterOverridden(_) => None,
            })
            .collect();
        assert_eq!(observed, expected[1..].to_vec());
    }

    #[tokio::test]
    async fn environment_overrides_reach_the_request() {
        let backend = FakeBackend::new("demo")
            .with_ticks(vec![Tick::status(StackStatus::CreateComplete)]);
        let env = HashMap::from([("Env".to_string(), "prod".to_string())]);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut driver = DeploymentDriver::new(&backend, ParameterResolver::new(env), fast_policy(5))
            .on_progress(move |progress| sink.lock().unwrap().push(progress.clone()));
        driver
            .run(deployment(
                "demo",
                vec![Parameter::new("Env", "dev"), Parameter::new("Size", "2")],
            ))
            .await
            .unwrap();

        assert_eq!(
            backend.created()[0].parameters(),
            &[Parameter::new("Env", "prod"), Parameter::new("Size", "2")]
        );
        assert!(
            seen.lock()
                .unwrap()
                .contains(&Progress::ParameterOverridden("Env".to_string()))
        );
    }
}

mod before_submit {
    use super::*;

    #[tokio::test]
    async fn runs_after_validation_and_before_submission() {
        let backend = FakeBackend::new("demo").with_ticks(vec![Tick::status(
            StackStatus::CreateComplete,
        )]);
        let seen = Arc::new(Mutex::new(None));

        let gate_seen = Arc::clone(&seen);
        let gate_backend = &backend;
        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5)).before_submit(
            async move {
                *gate_seen.lock().unwrap() = Some((
                    gate_backend.validate_calls(),
                    gate_backend.list_calls(),
                    gate_backend.created().len(),
                ));
            },
        );
        let outcome = driver.run(deployment("demo", vec![])).await.unwrap();

        assert!(outcome.is_success());
        assert_eq!(*seen.lock().unwrap(), Some((1, 1, 0)));
    }

    #[tokio::test]
    async fn skipped_when_validation_fails() {
        let backend = FakeBackend::new("demo").with_validation_error("Template format error");
        let ran = Arc::new(Mutex::new(false));

        let gate_ran = Arc::clone(&ran);
        let mut driver = DeploymentDriver::new(&backend, no_env(), fast_policy(5))
            .before_submit(async move { *gate_ran.lock().unwrap() = true });
        driver.run(deployment("demo", vec![])).await.unwrap_err();

        assert!(!*ran.lock().unwrap());
    }
}

mod type_state {
    use super::*;

    #[tokio::test]
    async fn transitions_can_be_driven_by_hand() {
        let backend = FakeBackend::new("demo")
            .with_declared_parameters(&["Env"])
            .with_ticks(vec![Tick::status(StackStatus::CreateComplete)]);

        let validated = deployment("demo", vec![Parameter::new("Env", "dev")])
            .validate(&backend, &no_env())
            .await
            .unwrap();
        assert_eq!(validated.summary().declared_parameters, vec!["Env".to_string()]);
        assert!(validated.overridden().is_empty());

        let decided = validated.decide(&backend).await.unwrap();
        assert_eq!(decided.mode(), DeployMode::Create);
        assert_eq!(decided.request().stack_name().as_str(), "demo");

        let submitted = match decided.submit(&backend).await.unwrap() {
            Submission::Accepted(submitted) => submitted,
            Submission::NoChange(_) => panic!("expected accepted submission"),
        };
        assert_eq!(submitted.stack_id(), &backend.stack_id());

        let outcome = submitted.wait(&backend, &fast_policy(2)).await.unwrap();
        assert!(outcome.is_success());
    }
}
