#![allow(clippy::must_use_candidate)]

pub mod converter;
pub mod error;
pub mod handler;
pub mod negotiation;
pub mod request;
pub mod resolver;
pub mod writer;

pub use converter::{ErrorKeys, MapRestErrorConverter, RestErrorConverter};
pub use error::{BuildError, RenderError};
pub use handler::{Outcome, RenderedError, RestExceptionHandler, RestExceptionHandlerBuilder};
pub use request::{HandlerInfo, IncludeRequest, RequestInfo};
pub use resolver::{DefaultRestErrorResolver, ErrorTemplate, RestErrorResolver};
pub use writer::{BodyWriter, FormWriter, JsonWriter, OutputMessage, TextWriter};
