//! Core types for the faultline REST error pipeline
//!
//! A [`Fault`] raised by a request handler is resolved into a [`RestError`],
//! which is converted into an [`ErrorBody`] for body writers to render.

#![allow(clippy::must_use_candidate)]

mod body;
mod fault;
mod rest_error;

pub use body::{BodyShape, ErrorBody};
pub use fault::{Fault, FaultKind, Lineage, SimpleFault};
pub use rest_error::{RestError, RestErrorBuilder};
