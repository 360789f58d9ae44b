use std::fmt;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use faultline_core::Fault;
use http::StatusCode;

/// Handler error carrying a fault to the exception handling layer
///
/// Handlers return `Result<_, Failure>` and use `?` on any [`Fault`]. The
/// response produced here is a bare 500 that the layer replaces with the
/// rendered error; it only reaches the client when the fault is left
/// unhandled.
#[derive(Clone)]
pub struct Failure(Arc<dyn Fault>);

impl Failure {
    pub fn new(fault: impl Fault) -> Self {
        Self(Arc::new(fault))
    }

    pub fn fault(&self) -> &dyn Fault {
        self.0.as_ref()
    }
}

impl<F: Fault> From<F> for Failure {
    fn from(fault: F) -> Self {
        Self::new(fault)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.0.kind().as_str())
            .field("message", &self.0.to_string())
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}
