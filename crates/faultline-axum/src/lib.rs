//! axum integration
//!
//! Handlers return [`Failure`] as their error type. The layer installed by
//! [`RouterExt::with_fault_handler`] picks the failure out of the response
//! and lets a [`RestExceptionHandler`] render it.

#![allow(clippy::must_use_candidate)]

mod failure;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use faultline_handler::{HandlerInfo, Outcome, RenderedError, RequestInfo, RestExceptionHandler};
use http::StatusCode;

pub use failure::Failure;

/// Installs the fault handling layer on a router
pub trait RouterExt {
    /// Render failures raised by routes added so far through `handler`
    #[must_use]
    fn with_fault_handler(self, handler: Arc<RestExceptionHandler>) -> Self;
}

impl<S> RouterExt for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_fault_handler(self, handler: Arc<RestExceptionHandler>) -> Self {
        self.layer(axum::middleware::from_fn(move |req, next| {
            let handler = Arc::clone(&handler);
            async move { fault_middleware(handler, req, next).await }
        }))
    }
}

/// Middleware that renders [`Failure`] responses
///
/// The matched route template names the handler, so `mapped_handlers`
/// entries are written as route paths, e.g. `/users/{username}`. Responses
/// without a failure pass through untouched, as do failures the handler
/// leaves unhandled.
pub async fn fault_middleware(handler: Arc<RestExceptionHandler>, request: Request, next: Next) -> Response {
    let info = RequestInfo::from_request(&request);
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| HandlerInfo::new(path.as_str().to_owned()));

    let mut response = next.run(request).await;

    let Some(failure) = response.extensions_mut().remove::<Failure>() else {
        return response;
    };

    match handler.handle(&info, route.as_ref(), failure.fault()) {
        Outcome::Handled(rendered) => rendered_response(rendered),
        Outcome::NotHandled => {
            tracing::debug!(kind = %failure.fault().kind(), "returning unrendered failure response");
            response
        }
    }
}

/// Response for a rendered error
///
/// Include sub-requests carry no status; they render into an enclosing
/// response, which defaults to 200.
fn rendered_response(rendered: RenderedError) -> Response {
    let (status, headers, body) = rendered.into_parts();

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status.unwrap_or(StatusCode::OK);
    response.headers_mut().extend(headers);
    response
}

#[cfg(test)]
mod tests {
    use axum::routing::get;
    use faultline_core::{Fault, FaultKind, SimpleFault};
    use faultline_handler::{DefaultRestErrorResolver, IncludeRequest};
    use http::header::{ACCEPT, CONTENT_TYPE};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    enum UserError {
        #[error("no such user: {0}")]
        NotFound(String),
    }

    impl Fault for UserError {
        fn kind(&self) -> FaultKind {
            match self {
                Self::NotFound(_) => FaultKind::from_static("resource.not_found.user"),
            }
        }
    }

    async fn show_user() -> Result<&'static str, Failure> {
        Err(UserError::NotFound("djones".to_owned()).into())
    }

    async fn show_order() -> Result<&'static str, Failure> {
        Err(SimpleFault::new("order.missing", "no order").into())
    }

    fn app(handler: RestExceptionHandler) -> Router {
        Router::new()
            .route("/users/{username}", get(show_user))
            .route("/orders/{id}", get(show_order))
            .route("/health", get(|| async { "ok" }))
            .with_fault_handler(Arc::new(handler))
    }

    fn handler() -> RestExceptionHandler {
        RestExceptionHandler::builder()
            .resolver(DefaultRestErrorResolver::new().with_mapping("resource.not_found", StatusCode::NOT_FOUND))
            .build()
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_request(uri: &str) -> Request {
        http::Request::builder()
            .uri(uri)
            .header(ACCEPT, "application/json")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn failure_is_rendered() {
        let response = app(handler()).oneshot(get_request("/users/djones")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(body_string(response).await, r#"{"status":404,"message":"no such user: djones"}"#);
    }

    #[tokio::test]
    async fn successful_response_passes_through() {
        let response = app(handler()).oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn unhandled_failure_keeps_bare_response() {
        let handler = RestExceptionHandler::builder()
            .resolver(DefaultRestErrorResolver::new().with_default_status(None))
            .build();
        let response = app(handler).oneshot(get_request("/orders/7")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<Failure>().is_none());
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn route_template_scopes_handling() {
        let handler = RestExceptionHandler::builder()
            .resolver(DefaultRestErrorResolver::new().with_mapping("resource.not_found", StatusCode::NOT_FOUND))
            .mapped_handlers(["/users/{username}"])
            .build();
        let app = app(handler);

        let response = app.clone().oneshot(get_request("/users/djones")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(get_request("/orders/7")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn include_request_keeps_enclosing_status() {
        let mut request = get_request("/users/djones");
        request.extensions_mut().insert(IncludeRequest);

        let response = app(handler()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], 404);
    }
}
