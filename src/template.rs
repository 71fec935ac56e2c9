// ABOUTME: Template loading and backend-side validation before any stack mutation.
// ABOUTME: Rejections and missing capability acknowledgements fail fast as TemplateError.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::backend::{BackendError, BackendErrorKind, TemplateOps, TemplateSummary};
use crate::types::Capability;

/// Errors produced while reading or validating a template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template rejected: {0}")]
    Rejected(String),

    #[error("template requires {0}, which is not in the acknowledged capabilities")]
    MissingCapability(Capability),

    /// The validation call itself failed; the template was never judged.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Template text as submitted to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    body: String,
}

impl Template {
    pub fn from_body(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let body = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_body(body))
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Checks a template with the backend and against the granted capabilities.
pub struct TemplateValidator<'a, B> {
    backend: &'a B,
    capabilities: &'a [Capability],
}

impl<'a, B: TemplateOps> TemplateValidator<'a, B> {
    pub fn new(backend: &'a B, capabilities: &'a [Capability]) -> Self {
        Self {
            backend,
            capabilities,
        }
    }

    /// Validate `template`.
    ///
    /// # Errors
    ///
    /// - `TemplateError::Rejected` if the backend refuses the template
    /// - `TemplateError::MissingCapability` if the template needs a capability
    ///   that was not granted
    /// - `TemplateError::Backend` if the backend could not be reached
    pub async fn validate(&self, template: &Template) -> Result<TemplateSummary, TemplateError> {
        let summary = match self.backend.validate_template(template.body()).await {
            Ok(summary) => summary,
            Err(e) if e.kind() == BackendErrorKind::Rejected => {
                let message = e.message().unwrap_or_default().to_string();
                return Err(TemplateError::Rejected(message));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(missing) = summary
            .required_capabilities
            .iter()
            .copied()
            .find(|required| !self.capabilities.iter().any(|c| c.covers(*required)))
        {
            return Err(TemplateError::MissingCapability(missing));
        }

        tracing::debug!(
            parameters = summary.declared_parameters.len(),
            "template validated"
        );
        Ok(summary)
    }
}
