//! Sample user directory app whose handlers raise faults

use std::sync::Arc;

use axum::extract::{Path, Request};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use faultline_axum::{Failure, RouterExt};
use faultline_config::Config;
use faultline_core::{Fault, FaultKind};
use faultline_handler::{IncludeRequest, RestExceptionHandler};
use serde::Serialize;

/// Header that marks a request as an include sub-request
pub const INCLUDE_HEADER: &str = "x-include";

#[derive(Debug, Serialize)]
pub struct User {
    pub username: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("no such user: {0}")]
    NotFound(String),
    #[error("username '{0}' is not valid")]
    InvalidName(String),
    #[error("user '{0}' is locked")]
    Locked(String),
}

impl Fault for UserError {
    fn kind(&self) -> FaultKind {
        match self {
            Self::NotFound(_) => FaultKind::from_static("resource.not_found.user"),
            Self::InvalidName(_) => FaultKind::from_static("validation.username"),
            Self::Locked(_) => FaultKind::from_static("user.locked"),
        }
    }

    fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Locked(_) => Some(StatusCode::LOCKED),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("order store unavailable")]
pub struct StoreUnavailable {
    #[source]
    pub source: std::io::Error,
}

impl Fault for StoreUnavailable {
    fn kind(&self) -> FaultKind {
        FaultKind::from_static("storage.unavailable")
    }
}

async fn show_user(Path(username): Path<String>) -> Result<Json<User>, Failure> {
    if username.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Err(UserError::InvalidName(username).into());
    }

    match username.as_str() {
        "jsmith" => Ok(Json(User {
            username,
            name: "Jane Smith".to_owned(),
        })),
        "locked" => Err(UserError::Locked(username).into()),
        _ => Err(UserError::NotFound(username).into()),
    }
}

async fn show_order(Path(_id): Path<u64>) -> Result<&'static str, Failure> {
    Err(StoreUnavailable {
        source: std::io::Error::other("connection refused"),
    }
    .into())
}

async fn mark_include(mut request: Request, next: Next) -> Response {
    if request.headers().contains_key(INCLUDE_HEADER) {
        request.extensions_mut().insert(IncludeRequest);
    }
    next.run(request).await
}

/// Sample routes with faults rendered by `handler`
pub fn router(handler: RestExceptionHandler) -> Router {
    Router::new()
        .route("/users/{username}", get(show_user))
        .route("/orders/{id}", get(show_order))
        .route("/health", get(|| async { "ok" }))
        .with_fault_handler(Arc::new(handler))
        .layer(axum::middleware::from_fn(mark_include))
}

/// Sample routes configured from TOML text
pub fn router_from_toml(raw: &str) -> anyhow::Result<Router> {
    let config = Config::parse(raw)?;
    let handler = RestExceptionHandler::from_config(&config)?;
    Ok(router(handler))
}
