//! Fault handling orchestration

use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use faultline_config::Config;
use faultline_core::{ErrorBody, Fault, RestError};
use http::header::{CACHE_CONTROL, HeaderValue};
use http::{HeaderMap, StatusCode};
use mime::Mime;

use crate::converter::{MapRestErrorConverter, RestErrorConverter};
use crate::error::{BuildError, RenderError};
use crate::negotiation;
use crate::request::{HandlerInfo, RequestInfo};
use crate::resolver::{DefaultRestErrorResolver, RestErrorResolver};
use crate::writer::{self, BodyWriter, OutputMessage};

/// Result of handling a fault
#[derive(Debug)]
pub enum Outcome {
    /// An error response was rendered; the host must not render again
    Handled(RenderedError),
    /// The fault was left for the host to handle
    NotHandled,
}

impl Outcome {
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    pub fn into_rendered(self) -> Option<RenderedError> {
        match self {
            Self::Handled(rendered) => Some(rendered),
            Self::NotHandled => None,
        }
    }
}

/// A fully written error response
#[derive(Debug, Clone)]
pub struct RenderedError {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Bytes,
}

impl RenderedError {
    /// Status to apply, absent for include sub-requests
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (Option<StatusCode>, HeaderMap, Bytes) {
        (self.status, self.headers, self.body)
    }
}

/// Turns faults raised by request handlers into REST error responses
///
/// Built once at startup and shared across requests. A call to
/// [`handle`](Self::handle) resolves the fault, converts the resolved error
/// and writes it with the first writer that supports one of the client's
/// accepted media types. The status is only reported once a writer has
/// produced the body, so a negotiation miss never leaves a status behind.
pub struct RestExceptionHandler {
    resolver: Arc<dyn RestErrorResolver>,
    converter: Option<Arc<dyn RestErrorConverter>>,
    writers: Vec<Box<dyn BodyWriter>>,
    mapped_handlers: HashSet<String>,
    prevent_response_caching: bool,
}

impl std::fmt::Debug for RestExceptionHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let writers: Vec<_> = self.writers.iter().map(|w| w.name()).collect();
        f.debug_struct("RestExceptionHandler")
            .field("converter", &self.converter.is_some())
            .field("writers", &writers)
            .field("mapped_handlers", &self.mapped_handlers)
            .field("prevent_response_caching", &self.prevent_response_caching)
            .finish_non_exhaustive()
    }
}

impl RestExceptionHandler {
    pub fn builder() -> RestExceptionHandlerBuilder {
        RestExceptionHandlerBuilder::default()
    }

    /// Build the handler and its collaborators from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the resolver section holds an unusable status
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        let resolver = DefaultRestErrorResolver::from_config(&config.resolver)?;

        let mut builder = Self::builder()
            .resolver(resolver)
            .writers(writer::from_config(&config.writers))
            .default_writers(config.handler.default_writers)
            .mapped_handlers(config.handler.mapped_handlers.iter().cloned())
            .prevent_response_caching(config.handler.prevent_response_caching);

        builder = match MapRestErrorConverter::from_config(&config.converter) {
            Some(converter) => builder.converter(converter),
            None => builder.without_converter(),
        };

        Ok(builder.build())
    }

    /// Whether this handler applies to faults raised by `handler`
    ///
    /// With no mapped handlers every fault is in scope. Otherwise the fault
    /// must come from one of the named handlers.
    pub fn applies_to(&self, handler: Option<&HandlerInfo>) -> bool {
        if self.mapped_handlers.is_empty() {
            return true;
        }
        handler.is_some_and(|h| self.mapped_handlers.contains(h.name()))
    }

    /// Resolve, convert and write the error response for `fault`
    pub fn handle(&self, request: &RequestInfo, handler: Option<&HandlerInfo>, fault: &dyn Fault) -> Outcome {
        if !self.applies_to(handler) {
            tracing::debug!(
                handler = handler.map(HandlerInfo::name),
                "fault raised outside mapped handlers"
            );
            return Outcome::NotHandled;
        }

        let Some(error) = self.resolver.resolve_error(request, handler, fault) else {
            tracing::debug!(kind = %fault.kind(), "resolver left fault unhandled");
            return Outcome::NotHandled;
        };

        match self.render(request, &error) {
            Ok(Some(rendered)) => Outcome::Handled(rendered),
            Ok(None) => {
                tracing::warn!(
                    kind = %fault.kind(),
                    status = error.status().as_u16(),
                    accept = ?request.headers().get(http::header::ACCEPT),
                    "no body writer supports the accepted media types"
                );
                Outcome::NotHandled
            }
            Err(e) => {
                tracing::error!(
                    kind = %fault.kind(),
                    status = error.status().as_u16(),
                    error = %e,
                    "failed to render error response"
                );
                Outcome::NotHandled
            }
        }
    }

    /// Convert and write a resolved error; `None` on a negotiation miss
    fn render(&self, request: &RequestInfo, error: &RestError) -> Result<Option<RenderedError>, RenderError> {
        let body = match &self.converter {
            Some(converter) => converter.convert(error)?,
            None => ErrorBody::Error(error.clone()),
        };

        let Some(mut output) = self.write(request, &body)? else {
            return Ok(None);
        };

        if self.prevent_response_caching {
            output
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        }

        let status = if request.is_include() {
            tracing::debug!(status = error.status().as_u16(), "include request, leaving status untouched");
            None
        } else {
            Some(error.status())
        };

        let (headers, body) = output.into_parts();
        Ok(Some(RenderedError { status, headers, body }))
    }

    /// Write `body` with the first writer supporting the most preferred
    /// accepted media type
    fn write(&self, request: &RequestInfo, body: &ErrorBody) -> Result<Option<OutputMessage>, RenderError> {
        for requested in negotiation::accepted_media_types(request.headers()) {
            let Some(writer) = self.select(body, &requested) else {
                continue;
            };

            tracing::debug!(writer = writer.name(), media_type = %requested, "writing error body");

            let mut output = OutputMessage::new();
            writer.write(body, &requested, &mut output)?;
            return Ok(Some(output));
        }

        Ok(None)
    }

    fn select(&self, body: &ErrorBody, requested: &Mime) -> Option<&dyn BodyWriter> {
        self.writers
            .iter()
            .find(|writer| writer.can_write(body, requested))
            .map(|writer| &**writer)
    }
}

/// Builder for [`RestExceptionHandler`]
///
/// Defaults to the table-driven resolver and the field-map converter. Writers
/// added here are tried first; the built-in JSON and text writers follow
/// them unless [`without_default_writers`](Self::without_default_writers)
/// is called.
#[must_use]
pub struct RestExceptionHandlerBuilder {
    resolver: Arc<dyn RestErrorResolver>,
    converter: Option<Arc<dyn RestErrorConverter>>,
    writers: Vec<Box<dyn BodyWriter>>,
    default_writers: bool,
    mapped_handlers: HashSet<String>,
    prevent_response_caching: bool,
}

impl Default for RestExceptionHandlerBuilder {
    fn default() -> Self {
        Self {
            resolver: Arc::new(DefaultRestErrorResolver::new()),
            converter: Some(Arc::new(MapRestErrorConverter::new())),
            writers: Vec::new(),
            default_writers: true,
            mapped_handlers: HashSet::new(),
            prevent_response_caching: false,
        }
    }
}

impl RestExceptionHandlerBuilder {
    pub fn resolver(mut self, resolver: impl RestErrorResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn converter(mut self, converter: impl RestErrorConverter + 'static) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Hand the resolved error to writers unconverted
    pub fn without_converter(mut self) -> Self {
        self.converter = None;
        self
    }

    /// Replace the configured writers; writers are tried in order
    pub fn writers(mut self, writers: Vec<Box<dyn BodyWriter>>) -> Self {
        self.writers = writers;
        self
    }

    /// Append a writer after those already configured
    pub fn writer(mut self, writer: impl BodyWriter + 'static) -> Self {
        self.writers.push(Box::new(writer));
        self
    }

    /// Whether the built-in writers follow the configured ones
    pub const fn default_writers(mut self, enabled: bool) -> Self {
        self.default_writers = enabled;
        self
    }

    /// Use only the configured writers
    pub const fn without_default_writers(self) -> Self {
        self.default_writers(false)
    }

    /// Restrict handling to faults raised by the named handlers
    pub fn mapped_handlers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mapped_handlers.extend(names.into_iter().map(Into::into));
        self
    }

    pub const fn prevent_response_caching(mut self, enabled: bool) -> Self {
        self.prevent_response_caching = enabled;
        self
    }

    pub fn build(self) -> RestExceptionHandler {
        let mut writers = self.writers;
        if self.default_writers {
            writers.extend(writer::default_writers());
        }

        RestExceptionHandler {
            resolver: self.resolver,
            converter: self.converter,
            writers,
            mapped_handlers: self.mapped_handlers,
            prevent_response_caching: self.prevent_response_caching,
        }
    }
}
