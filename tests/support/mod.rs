// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted in-memory backend for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use stackdeploy::backend::{
    BackendError, ContinuationToken, EventOps, Page, RejectedSnafu, StackNotFoundSnafu, StackOps,
    TemplateOps, TemplateSummary, TransportSnafu,
};
use stackdeploy::deploy::DeploymentRequest;
use stackdeploy::stack::{StackDescription, StackEvent, StackStatus, StackSummary};
use stackdeploy::types::{Capability, EventId, StackId};
use parking_lot::Mutex;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("stackdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Build event number `n`; higher numbers are later.
pub fn event(n: i64, logical_id: &str, status: &str) -> StackEvent {
    StackEvent {
        event_id: EventId::new(format!("evt-{n}")),
        resource_type: "AWS::S3::Bucket".to_string(),
        logical_resource_id: logical_id.to_string(),
        physical_resource_id: None,
        resource_status: status.to_string(),
        resource_status_reason: None,
        timestamp: base_time() + ChronoDuration::seconds(n),
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// One scripted step: each describe call applies the next tick.
#[derive(Debug, Clone)]
pub struct Tick {
    pub status: StackStatus,
    pub events: Vec<StackEvent>,
}

impl Tick {
    pub fn new(status: StackStatus, events: Vec<StackEvent>) -> Self {
        Self { status, events }
    }

    pub fn status(status: StackStatus) -> Self {
        Self::new(status, Vec::new())
    }
}

#[derive(Default)]
struct State {
    present: bool,
    applied: usize,
    created: Vec<DeploymentRequest>,
    updated: Vec<DeploymentRequest>,
    list_calls: usize,
    describe_calls: usize,
    validate_calls: usize,
}

/// In-memory backend driven by a script of status ticks.
///
/// Events are served newest first and paginated like the real service.
pub struct FakeBackend {
    name: String,
    listed: Vec<StackSummary>,
    initial_status: Option<StackStatus>,
    history: Vec<StackEvent>,
    ticks: Vec<Tick>,
    page_size: usize,
    submit_error: Option<(String, String)>,
    validation_error: Option<String>,
    required_capabilities: Vec<Capability>,
    declared_parameters: Vec<String>,
    fail_events: bool,
    state: Mutex<State>,
}

impl FakeBackend {
    /// A backend that knows about `name` but has no live stack by that name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            listed: Vec::new(),
            initial_status: None,
            history: Vec::new(),
            ticks: Vec::new(),
            page_size: 100,
            submit_error: None,
            validation_error: None,
            required_capabilities: Vec::new(),
            declared_parameters: Vec::new(),
            fail_events: false,
            state: Mutex::new(State::default()),
        }
    }

    pub fn stack_id(&self) -> StackId {
        stack_id(&self.name)
    }

    /// The tracked stack already exists with `status`.
    pub fn existing(mut self, status: StackStatus) -> Self {
        self.listed.push(summary(&self.name, status));
        self.initial_status = Some(status);
        self.state.get_mut().present = true;
        self
    }

    /// Add another stack to the listing.
    pub fn with_listed(mut self, name: &str, status: StackStatus) -> Self {
        self.listed.push(summary(name, status));
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Events that exist before the script starts, oldest first.
    pub fn with_history(mut self, events: Vec<StackEvent>) -> Self {
        self.history = events;
        self
    }

    pub fn with_ticks(mut self, ticks: Vec<Tick>) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_submit_error(mut self, code: &str, message: &str) -> Self {
        self.submit_error = Some((code.to_string(), message.to_string()));
        self
    }

    pub fn with_validation_error(mut self, message: &str) -> Self {
        self.validation_error = Some(message.to_string());
        self
    }

    pub fn with_required_capabilities(mut self, capabilities: Vec<Capability>) -> Self {
        self.required_capabilities = capabilities;
        self
    }

    pub fn with_declared_parameters(mut self, keys: &[&str]) -> Self {
        self.declared_parameters = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_failing_events(mut self) -> Self {
        self.fail_events = true;
        self
    }

    pub fn created(&self) -> Vec<DeploymentRequest> {
        self.state.lock().created.clone()
    }

    pub fn updated(&self) -> Vec<DeploymentRequest> {
        self.state.lock().updated.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().list_calls
    }

    pub fn describe_calls(&self) -> usize {
        self.state.lock().describe_calls
    }

    pub fn validate_calls(&self) -> usize {
        self.state.lock().validate_calls
    }

    fn matches(&self, stack: &str) -> bool {
        stack == self.name || stack == self.stack_id().as_str()
    }

    fn visible_events(&self, applied: usize) -> Vec<StackEvent> {
        let mut events = self.history.clone();
        for tick in self.ticks.iter().take(applied) {
            events.extend(tick.events.iter().cloned());
        }
        events.reverse();
        events
    }

    fn submit(&self, request: &DeploymentRequest, create: bool) -> Result<StackId, BackendError> {
        if let Some((code, message)) = &self.submit_error {
            return RejectedSnafu {
                operation: if create { "CreateStack" } else { "UpdateStack" },
                code: Some(code.clone()),
                message: message.clone(),
            }
            .fail();
        }

        let mut state = self.state.lock();
        state.present = true;
        if create {
            state.created.push(request.clone());
        } else {
            state.updated.push(request.clone());
        }
        Ok(self.stack_id())
    }
}

fn stack_id(name: &str) -> StackId {
    StackId::new(format!(
        "arn:aws:cloudformation:us-east-1:123456789012:stack/{name}/fake"
    ))
}

fn summary(name: &str, status: StackStatus) -> StackSummary {
    StackSummary {
        name: name.to_string(),
        id: stack_id(name),
        status,
    }
}

fn paginate<T: Clone>(
    items: &[T],
    token: Option<&ContinuationToken>,
    page_size: usize,
) -> Page<T> {
    let start: usize = token.map(|t| t.as_str().parse().unwrap()).unwrap_or(0);
    let end = (start + page_size).min(items.len());
    let next = (end < items.len()).then(|| ContinuationToken::new(end.to_string()));
    Page::new(items[start..end].to_vec(), next)
}

#[async_trait]
impl StackOps for FakeBackend {
    async fn list_stacks(
        &self,
        token: Option<&ContinuationToken>,
    ) -> Result<Page<StackSummary>, BackendError> {
        self.state.lock().list_calls += 1;
        Ok(paginate(&self.listed, token, self.page_size))
    }

    async fn describe_stack(&self, stack: &str) -> Result<StackDescription, BackendError> {
        let mut state = self.state.lock();
        state.describe_calls += 1;

        if !self.matches(stack) || !state.present {
            return StackNotFoundSnafu { stack }.fail();
        }

        let status = if self.ticks.is_empty() {
            self.initial_status.unwrap_or(StackStatus::CreateInProgress)
        } else {
            state.applied = (state.applied + 1).min(self.ticks.len());
            self.ticks[state.applied - 1].status
        };

        Ok(StackDescription {
            stack_name: self.name.clone(),
            stack_id: self.stack_id(),
            stack_status: status,
            stack_status_reason: status
                .is_terminal()
                .then(|| format!("reached {status}")),
            description: None,
            creation_time: Some(base_time()),
            last_updated_time: None,
            parameters: Vec::new(),
            outputs: Vec::new(),
            capabilities: Vec::new(),
            disable_rollback: false,
        })
    }

    async fn create_stack(&self, request: &DeploymentRequest) -> Result<StackId, BackendError> {
        self.submit(request, true)
    }

    async fn update_stack(&self, request: &DeploymentRequest) -> Result<StackId, BackendError> {
        self.submit(request, false)
    }
}

#[async_trait]
impl EventOps for FakeBackend {
    async fn describe_stack_events(
        &self,
        stack: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<Page<StackEvent>, BackendError> {
        if self.fail_events {
            return TransportSnafu {
                operation: "DescribeStackEvents",
                message: "connection reset",
            }
            .fail();
        }

        let state = self.state.lock();
        if !self.matches(stack) || !state.present {
            return StackNotFoundSnafu { stack }.fail();
        }

        let events = self.visible_events(state.applied);
        Ok(paginate(&events, token, self.page_size))
    }
}

#[async_trait]
impl TemplateOps for FakeBackend {
    async fn validate_template(&self, _body: &str) -> Result<TemplateSummary, BackendError> {
        self.state.lock().validate_calls += 1;

        if let Some(message) = &self.validation_error {
            return RejectedSnafu {
                operation: "ValidateTemplate",
                code: Some("ValidationError".to_string()),
                message: message.clone(),
            }
            .fail();
        }

        Ok(TemplateSummary {
            description: None,
            required_capabilities: self.required_capabilities.clone(),
            declared_parameters: self.declared_parameters.clone(),
        })
    }
}
