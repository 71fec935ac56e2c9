// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the deployment driver with an event tailer alongside and reports the result.

use futures::StreamExt;
use stackdeploy::backend::{BackendErrorKind, CloudFormationBackend};
use stackdeploy::config::Config;
use stackdeploy::deploy::{
    DeployMode, DeployPhase, Deployment, DeploymentDriver, DeploymentOutcome, Progress,
};
use stackdeploy::diagnostics::TailIssue;
use stackdeploy::error::{Error, Result};
use stackdeploy::output::Output;
use stackdeploy::params::{ParameterResolver, ParameterSet};
use stackdeploy::tail::{EventTailer, StartAt, TailEvent};
use stackdeploy::template::Template;
use stackdeploy::types::{StackIdentity, StackName};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

type Positioned = std::result::Result<EventTailer<CloudFormationBackend>, TailIssue>;

/// Create or update one stack and wait for it to settle.
pub async fn deploy(
    stack_name: StackName,
    template_path: &Path,
    parameters_path: &Path,
    config: Config,
    mut output: Output,
) -> Result<()> {
    output.start_timer();

    // Local files first: nothing talks to the backend until they are usable.
    let template = Template::load(template_path)?;
    let parameters = ParameterSet::load(parameters_path)?;
    let identity = StackIdentity::new(stack_name, config.region.clone());
    let stack = identity.name().to_string();

    let backend = Arc::new(CloudFormationBackend::connect(identity.region()).await);

    let (ready_tx, ready_rx) = oneshot::channel::<()>();
    let shown = Arc::new(AtomicUsize::new(0));
    let mut tail = None;
    let mut position = None;
    if config.tail.enabled {
        let (positioned_tx, positioned_rx) = oneshot::channel::<Positioned>();
        tail = Some(spawn_tail(positioned_rx, ready_rx, Arc::clone(&shown), output));

        let backend = Arc::clone(&backend);
        let stack = stack.clone();
        let interval = config.tail.interval;
        position = Some(async move {
            let _ = positioned_tx.send(position_tailer(backend, &stack, interval).await);
        });
    }

    let mut ready = Some(ready_tx);
    let observer_stack = stack.clone();
    let observer = move |progress: &Progress| match progress {
        Progress::Phase(DeployPhase::Submitting { mode, .. }) => {
            let verb = match mode {
                DeployMode::Create => "Creating",
                DeployMode::Update => "Updating",
            };
            output.progress(&format!("{verb} {observer_stack}"));
        }
        Progress::Phase(DeployPhase::Waiting) => {
            output.progress("...waiting for stack to be ready...");
            if let Some(tx) = ready.take() {
                let _ = tx.send(());
            }
        }
        Progress::ParameterOverridden(key) => {
            output.progress(&format!("Updated {key} parameter from environment variables."));
        }
        Progress::Phase(_) => {}
    };

    let deployment = Deployment::new(
        identity,
        template,
        config.capabilities.clone(),
        parameters,
    );
    let mut driver = DeploymentDriver::new(
        backend.as_ref(),
        ParameterResolver::from_process_env(),
        config.wait.policy(),
    )
    .on_progress(observer);
    // Positioned after validation so the template check is the first backend
    // call, and before submission so no event of this deployment is skipped.
    if let Some(position) = position {
        driver = driver.before_submit(position);
    }

    let result = tokio::select! {
        result = driver.run(deployment) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    tracing::debug!(phases = ?driver.history(), "driver finished");
    // Dropping the driver releases the tail task if waiting was never reached.
    drop(driver);

    if let Some(handle) = tail {
        let issue = finish_tail(handle, config.tail.drain, result.is_none(), &shown).await;
        if let Some(issue) = issue {
            tracing::warn!(
                kind = ?issue.backend_kind(),
                shown = issue.events_shown(),
                "{}",
                issue
            );
            output.warning(&issue.to_string());
        }
    }

    let outcome = match result {
        Some(result) => result?,
        None => return Err(Error::Interrupted { stack }),
    };

    match outcome {
        DeploymentOutcome::Succeeded(description) => {
            output.report(&description);
            output.success(&format!("Stack {stack} is {}", description.stack_status));
            Ok(())
        }
        DeploymentOutcome::NoChange => {
            output.success("No changes");
            Ok(())
        }
        DeploymentOutcome::Failed { status, reason } => Err(Error::DeploymentFailed {
            stack,
            status,
            reason,
        }),
    }
}

/// Position a tailer so only this deployment's events are shown.
async fn position_tailer(
    backend: Arc<CloudFormationBackend>,
    stack: &str,
    interval: Duration,
) -> Positioned {
    let started =
        match EventTailer::start(Arc::clone(&backend), stack, StartAt::Latest, interval).await {
            // A stack that does not exist yet has no history to skip.
            Err(e) if e.kind() == BackendErrorKind::NotFound => {
                EventTailer::start(backend, stack, StartAt::Absolute(0), interval).await
            }
            other => other,
        };

    started.map_err(|e| TailIssue::unpositioned(&e))
}

/// Follow events once the deployment is waiting.
///
/// Resolves to `None` when the stream reached a terminal status or the
/// deployment never got as far as submitting.
fn spawn_tail(
    positioned: oneshot::Receiver<Positioned>,
    ready: oneshot::Receiver<()>,
    shown: Arc<AtomicUsize>,
    output: Output,
) -> JoinHandle<Option<TailIssue>> {
    tokio::spawn(async move {
        let tailer = match positioned.await {
            Ok(Ok(tailer)) => tailer,
            Ok(Err(issue)) => return Some(issue),
            Err(_) => return None,
        };
        if ready.await.is_err() {
            return None;
        }

        let mut terminal = false;
        let mut events = std::pin::pin!(tailer.into_stream());
        while let Some(item) = events.next().await {
            match item {
                Ok(TailEvent::Event(event)) => {
                    output.event(&event);
                    shown.fetch_add(1, Ordering::Relaxed);
                }
                Ok(TailEvent::Terminal(marker)) => {
                    output.terminal(marker);
                    terminal = true;
                }
                Err(e) => return Some(TailIssue::poll_failed(shown.load(Ordering::Relaxed), &e)),
            }
        }

        (!terminal).then(|| TailIssue::EndedEarly {
            shown: shown.load(Ordering::Relaxed),
        })
    })
}

/// Give the tailer a short drain period, then stop it.
async fn finish_tail(
    mut handle: JoinHandle<Option<TailIssue>>,
    drain: Duration,
    interrupted: bool,
    shown: &AtomicUsize,
) -> Option<TailIssue> {
    if interrupted {
        handle.abort();
        return None;
    }

    match tokio::time::timeout(drain, &mut handle).await {
        Ok(Ok(issue)) => issue,
        Ok(Err(e)) => Some(TailIssue::TaskAborted(e.to_string())),
        Err(_) => {
            handle.abort();
            Some(TailIssue::DrainExpired {
                shown: shown.load(Ordering::Relaxed),
                drain,
            })
        }
    }
}
