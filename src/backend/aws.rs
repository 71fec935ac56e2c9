// ABOUTME: CloudFormation backend implementation over the AWS SDK.
// ABOUTME: Maps SDK requests, responses and errors onto the backend traits.

use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudformation::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudformation::types::{
    Capability as AwsCapability, Parameter as AwsParameter, Stack, StackEvent as AwsStackEvent,
    StackSummary as AwsStackSummary,
};
use chrono::{DateTime, Utc};

use super::traits::{EventOps, StackOps, TemplateOps, TemplateSummary};
use super::{
    BackendError, ContinuationToken, MalformedSnafu, Page, RejectedSnafu, StackNotFoundSnafu,
    TransportSnafu,
};
use crate::deploy::DeploymentRequest;
use crate::params::Parameter;
use crate::stack::{StackDescription, StackEvent, StackOutput, StackStatus, StackSummary};
use crate::types::{Capability, EventId, Region, StackId};

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn map_sdk_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.as_service_error() {
        Some(service) => RejectedSnafu {
            operation,
            code: service.code().map(str::to_string),
            message: service.message().unwrap_or("no message").to_string(),
        }
        .build(),
        None => TransportSnafu {
            operation,
            message: DisplayErrorContext(&err).to_string(),
        }
        .build(),
    }
}

/// Describe calls report a missing stack as a validation error.
fn map_lookup_error<E, R>(operation: &'static str, stack: &str, err: SdkError<E, R>) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let missing = err.as_service_error().is_some_and(|service| {
        service.code() == Some("ValidationError")
            && service.message().is_some_and(|m| m.contains("does not exist"))
    });

    if missing {
        StackNotFoundSnafu { stack }.build()
    } else {
        map_sdk_error(operation, err)
    }
}

fn malformed(operation: &'static str, detail: impl Into<String>) -> BackendError {
    MalformedSnafu {
        operation,
        detail: detail.into(),
    }
    .build()
}

// =============================================================================
// Conversion Helpers
// =============================================================================

fn to_utc(time: &AwsDateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(time.secs(), time.subsec_nanos())
}

fn parse_status(operation: &'static str, status: Option<&str>) -> Result<StackStatus, BackendError> {
    let status = status.ok_or_else(|| malformed(operation, "missing stack status"))?;
    status
        .parse()
        .map_err(|e: crate::stack::UnknownStatus| malformed(operation, e.to_string()))
}

fn convert_capabilities(capabilities: &[AwsCapability]) -> Vec<Capability> {
    capabilities
        .iter()
        .filter_map(|c| match c.as_str().parse() {
            Ok(capability) => Some(capability),
            Err(e) => {
                tracing::warn!("ignoring capability reported by backend: {}", e);
                None
            }
        })
        .collect()
}

fn convert_summary(summary: &AwsStackSummary) -> Option<StackSummary> {
    summary_from_parts(
        summary.stack_name().unwrap_or_default(),
        summary.stack_id().unwrap_or_default(),
        summary.stack_status().map(|s| s.as_str()),
    )
}

/// Listings cover every stack in the account; one with a status this build
/// does not know is skipped instead of failing the whole page.
fn summary_from_parts(name: &str, id: &str, status: Option<&str>) -> Option<StackSummary> {
    match parse_status("ListStacks", status) {
        Ok(status) => Some(StackSummary {
            name: name.to_string(),
            id: StackId::new(id),
            status,
        }),
        Err(e) => {
            tracing::warn!(stack = name, "skipping listed stack: {}", e);
            None
        }
    }
}

fn convert_stack(stack: &Stack) -> Result<StackDescription, BackendError> {
    let parameters = stack
        .parameters()
        .iter()
        .map(|p| Parameter {
            key: p.parameter_key().unwrap_or_default().to_string(),
            value: p.parameter_value().unwrap_or_default().to_string(),
        })
        .collect();

    let outputs = stack
        .outputs()
        .iter()
        .map(|o| StackOutput {
            output_key: o.output_key().unwrap_or_default().to_string(),
            output_value: o.output_value().unwrap_or_default().to_string(),
            description: o.description().map(str::to_string),
            export_name: o.export_name().map(str::to_string),
        })
        .collect();

    Ok(StackDescription {
        stack_name: stack.stack_name().unwrap_or_default().to_string(),
        stack_id: StackId::new(stack.stack_id().unwrap_or_default()),
        stack_status: parse_status("DescribeStacks", stack.stack_status().map(|s| s.as_str()))?,
        stack_status_reason: stack.stack_status_reason().map(str::to_string),
        description: stack.description().map(str::to_string),
        creation_time: stack.creation_time().and_then(to_utc),
        last_updated_time: stack.last_updated_time().and_then(to_utc),
        parameters,
        outputs,
        capabilities: convert_capabilities(stack.capabilities()),
        disable_rollback: stack.disable_rollback().unwrap_or(false),
    })
}

fn convert_event(event: &AwsStackEvent) -> Result<StackEvent, BackendError> {
    let timestamp = event
        .timestamp()
        .and_then(to_utc)
        .ok_or_else(|| malformed("DescribeStackEvents", "event without timestamp"))?;

    Ok(StackEvent {
        event_id: EventId::new(event.event_id().unwrap_or_default()),
        resource_type: event.resource_type().unwrap_or_default().to_string(),
        logical_resource_id: event.logical_resource_id().unwrap_or_default().to_string(),
        physical_resource_id: event
            .physical_resource_id()
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        resource_status: event
            .resource_status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default(),
        resource_status_reason: event.resource_status_reason().map(str::to_string),
        timestamp,
    })
}

fn request_parameters(request: &DeploymentRequest) -> Vec<AwsParameter> {
    request
        .parameters()
        .iter()
        .map(|p| {
            AwsParameter::builder()
                .parameter_key(&p.key)
                .parameter_value(&p.value)
                .build()
        })
        .collect()
}

fn request_capabilities(request: &DeploymentRequest) -> Vec<AwsCapability> {
    request
        .capabilities()
        .iter()
        .map(|c| AwsCapability::from(c.as_str()))
        .collect()
}

// =============================================================================
// CloudFormationBackend
// =============================================================================

/// Backend talking to CloudFormation in one region.
#[derive(Debug, Clone)]
pub struct CloudFormationBackend {
    client: Client,
}

impl CloudFormationBackend {
    /// Build a client from the default credential chain for `region`.
    pub async fn connect(region: &Region) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.as_str().to_string()))
            .load()
            .await;

        Self::from_client(Client::new(&config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StackOps for CloudFormationBackend {
    async fn list_stacks(
        &self,
        token: Option<&ContinuationToken>,
    ) -> Result<Page<StackSummary>, BackendError> {
        let output = self
            .client
            .list_stacks()
            .set_next_token(token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| map_sdk_error("ListStacks", e))?;

        let items = output
            .stack_summaries()
            .iter()
            .filter_map(convert_summary)
            .collect();

        Ok(Page::new(items, output.next_token().map(ContinuationToken::new)))
    }

    async fn describe_stack(&self, stack: &str) -> Result<StackDescription, BackendError> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack)
            .send()
            .await
            .map_err(|e| map_lookup_error("DescribeStacks", stack, e))?;

        match output.stacks().first() {
            Some(found) => convert_stack(found),
            None => StackNotFoundSnafu { stack }.fail(),
        }
    }

    async fn create_stack(&self, request: &DeploymentRequest) -> Result<StackId, BackendError> {
        let output = self
            .client
            .create_stack()
            .stack_name(request.stack_name().as_str())
            .template_body(request.template_body())
            .set_parameters(Some(request_parameters(request)))
            .set_capabilities(Some(request_capabilities(request)))
            .disable_rollback(request.disable_rollback())
            .send()
            .await
            .map_err(|e| map_sdk_error("CreateStack", e))?;

        output
            .stack_id()
            .map(StackId::new)
            .ok_or_else(|| malformed("CreateStack", "response without stack id"))
    }

    async fn update_stack(&self, request: &DeploymentRequest) -> Result<StackId, BackendError> {
        let output = self
            .client
            .update_stack()
            .stack_name(request.stack_name().as_str())
            .template_body(request.template_body())
            .set_parameters(Some(request_parameters(request)))
            .set_capabilities(Some(request_capabilities(request)))
            .disable_rollback(request.disable_rollback())
            .send()
            .await
            .map_err(|e| map_sdk_error("UpdateStack", e))?;

        output
            .stack_id()
            .map(StackId::new)
            .ok_or_else(|| malformed("UpdateStack", "response without stack id"))
    }
}

#[async_trait]
impl EventOps for CloudFormationBackend {
    async fn describe_stack_events(
        &self,
        stack: &str,
        token: Option<&ContinuationToken>,
    ) -> Result<Page<StackEvent>, BackendError> {
        let output = self
            .client
            .describe_stack_events()
            .stack_name(stack)
            .set_next_token(token.map(|t| t.as_str().to_string()))
            .send()
            .await
            .map_err(|e| map_lookup_error("DescribeStackEvents", stack, e))?;

        let items = output
            .stack_events()
            .iter()
            .map(convert_event)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, output.next_token().map(ContinuationToken::new)))
    }
}

#[async_trait]
impl TemplateOps for CloudFormationBackend {
    async fn validate_template(&self, body: &str) -> Result<TemplateSummary, BackendError> {
        let output = self
            .client
            .validate_template()
            .template_body(body)
            .send()
            .await
            .map_err(|e| map_sdk_error("ValidateTemplate", e))?;

        Ok(TemplateSummary {
            description: output.description().map(str::to_string),
            required_capabilities: convert_capabilities(output.capabilities()),
            declared_parameters: output
                .parameters()
                .iter()
                .filter_map(|p| p.parameter_key().map(str::to_string))
                .collect(),
        })
    }
}
