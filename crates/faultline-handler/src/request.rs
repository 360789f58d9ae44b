use std::borrow::Cow;

use http::{HeaderMap, Method, Uri};

/// Marker extension for include sub-requests
///
/// A request carrying this extension renders into an enclosing response
/// whose status was already committed, so the exception handler leaves the
/// status alone and only writes the body.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncludeRequest;

/// What the exception handler needs to know about the inbound request
#[derive(Debug, Clone)]
pub struct RequestInfo {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    include: bool,
}

impl RequestInfo {
    pub const fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
            include: false,
        }
    }

    /// Capture request details from HTTP request parts
    pub fn from_parts(parts: &http::request::Parts) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            include: parts.extensions.get::<IncludeRequest>().is_some(),
        }
    }

    /// Capture request details from a full request, leaving the body alone
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
            include: request.extensions().get::<IncludeRequest>().is_some(),
        }
    }

    /// Mark this request as an include sub-request
    #[must_use]
    pub const fn into_include(mut self) -> Self {
        self.include = true;
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Whether this request renders into an enclosing response
    pub const fn is_include(&self) -> bool {
        self.include
    }
}

/// Reference to the handler that was executing when the fault was raised
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerInfo {
    name: Cow<'static, str>,
}

impl HandlerInfo {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Handler name, typically the matched route
    pub fn name(&self) -> &str {
        &self.name
    }
}
