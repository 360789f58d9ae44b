//! Fault to `RestError` resolution

use std::collections::HashMap;

use faultline_config::{MappingDefinition, ResolverConfig};
use faultline_core::{Fault, RestError};
use http::StatusCode;

use crate::error::BuildError;
use crate::request::{HandlerInfo, RequestInfo};

/// Resolves a fault into the error to render
pub trait RestErrorResolver: Send + Sync {
    /// Error to render for `fault`, or `None` to leave it to the host
    ///
    /// `handler` is absent when the fault was raised before a handler was
    /// chosen, e.g. for unmatched routes.
    fn resolve_error(&self, request: &RequestInfo, handler: Option<&HandlerInfo>, fault: &dyn Fault)
    -> Option<RestError>;
}

/// Pre-built error fields for a mapped fault kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTemplate {
    pub status: StatusCode,
    pub code: u32,
    pub message: Option<String>,
    pub developer_message: Option<String>,
    pub more_info_url: Option<String>,
}

impl ErrorTemplate {
    pub const fn new(status: StatusCode) -> Self {
        Self {
            status,
            code: 0,
            message: None,
            developer_message: None,
            more_info_url: None,
        }
    }
}

impl From<StatusCode> for ErrorTemplate {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

/// Table-driven resolver
///
/// Looks up the fault's kind lineage, most specific first, against the
/// configured mappings. Faults with no mapping fall back to the status they
/// carry, then to the default status. Only when unmapped handling is
/// disabled does a fault go unresolved.
#[derive(Debug, Clone)]
pub struct DefaultRestErrorResolver {
    mappings: HashMap<String, ErrorTemplate>,
    default_status: Option<StatusCode>,
    default_message: Option<String>,
    developer_messages: bool,
}

impl Default for DefaultRestErrorResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultRestErrorResolver {
    /// Resolver with no mappings and a default status of 500
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
            default_status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            default_message: None,
            developer_messages: false,
        }
    }

    /// Build from the `[resolver]` config section
    ///
    /// # Errors
    ///
    /// Returns an error if a configured status is not a valid HTTP status
    pub fn from_config(config: &ResolverConfig) -> Result<Self, BuildError> {
        let mut resolver = Self::new()
            .with_developer_messages(config.developer_messages)
            .with_default_message(config.default_message.clone());

        resolver.default_status = if config.handle_unmapped {
            Some(status_from(config.default_status, "resolver.default_status")?)
        } else {
            None
        };

        for (kind, mapping) in &config.mappings {
            let template = match mapping {
                MappingDefinition::Status(status) => ErrorTemplate::new(status_from(*status, kind)?),
                MappingDefinition::Template(template) => ErrorTemplate {
                    status: status_from(template.status, kind)?,
                    code: template.code,
                    message: template.message.clone(),
                    developer_message: template.developer_message.clone(),
                    more_info_url: template.more_info_url.as_ref().map(ToString::to_string),
                },
            };
            resolver = resolver.with_mapping(kind.clone(), template);
        }

        Ok(resolver)
    }

    /// Map a fault kind and its descendants to a status or template
    #[must_use]
    pub fn with_mapping(mut self, kind: impl Into<String>, template: impl Into<ErrorTemplate>) -> Self {
        let kind = kind.into();
        self.mappings
            .insert(kind.trim_matches('.').to_owned(), template.into());
        self
    }

    /// Status for unmapped faults; `None` leaves them unresolved
    #[must_use]
    pub const fn with_default_status(mut self, status: Option<StatusCode>) -> Self {
        self.default_status = status;
        self
    }

    /// Message for unmapped faults
    #[must_use]
    pub fn with_default_message(mut self, message: Option<String>) -> Self {
        self.default_message = message;
        self
    }

    /// Fill the developer message from the fault's error chain
    #[must_use]
    pub const fn with_developer_messages(mut self, enabled: bool) -> Self {
        self.developer_messages = enabled;
        self
    }

    /// Most specific mapping for a fault, with the kind that matched
    fn lookup(&self, fault: &dyn Fault) -> Option<(String, &ErrorTemplate)> {
        let kind = fault.kind();
        kind.lineage()
            .find_map(|candidate| self.mappings.get(candidate).map(|t| (candidate.to_owned(), t)))
    }

    fn from_template(&self, template: &ErrorTemplate, fault: &dyn Fault) -> RestError {
        let message = template.message.clone().or_else(|| fault_message(fault));
        let developer_message = template.developer_message.clone().or_else(|| self.developer_message(fault));

        RestError::builder(template.status)
            .code(template.code)
            .maybe_message(message)
            .maybe_developer_message(developer_message)
            .maybe_more_info_url(template.more_info_url.clone())
            .build()
    }

    fn developer_message(&self, fault: &dyn Fault) -> Option<String> {
        self.developer_messages.then(|| error_chain(fault)).flatten()
    }
}

impl RestErrorResolver for DefaultRestErrorResolver {
    fn resolve_error(
        &self,
        request: &RequestInfo,
        handler: Option<&HandlerInfo>,
        fault: &dyn Fault,
    ) -> Option<RestError> {
        if let Some((matched, template)) = self.lookup(fault) {
            tracing::debug!(
                kind = %fault.kind(),
                %matched,
                status = template.status.as_u16(),
                "fault matched configured mapping"
            );
            return Some(self.from_template(template, fault));
        }

        if let Some(status) = fault.status() {
            tracing::debug!(kind = %fault.kind(), status = status.as_u16(), "using status carried by fault");
            return Some(self.from_template(&ErrorTemplate::new(status), fault));
        }

        let Some(status) = self.default_status else {
            tracing::debug!(
                kind = %fault.kind(),
                uri = %request.uri(),
                handler = handler.map(HandlerInfo::name),
                "fault left unresolved"
            );
            return None;
        };

        Some(
            RestError::builder(status)
                .maybe_message(self.default_message.clone())
                .maybe_developer_message(self.developer_message(fault))
                .build(),
        )
    }
}

fn status_from(status: u16, context: &str) -> Result<StatusCode, BuildError> {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| (100..600).contains(&s.as_u16()))
        .ok_or_else(|| BuildError::InvalidStatus {
            status,
            context: context.to_owned(),
        })
}

/// The fault's own text, if it has any
fn fault_message(fault: &dyn Fault) -> Option<String> {
    let text = fault.to_string();
    (!text.trim().is_empty()).then_some(text)
}

/// The fault's text followed by each source, separated by `: `
fn error_chain(fault: &dyn Fault) -> Option<String> {
    let mut parts = Vec::new();
    parts.extend(fault_message(fault));

    let mut source = fault.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.trim().is_empty() {
            parts.push(text);
        }
        source = cause.source();
    }

    (!parts.is_empty()).then(|| parts.join(": "))
}
