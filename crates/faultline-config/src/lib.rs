#![allow(clippy::must_use_candidate)]

pub mod converter;
mod env;
pub mod handler;
mod loader;
pub mod logging;
pub mod resolver;
pub mod writers;

use serde::Deserialize;

pub use converter::*;
pub use handler::*;
pub use logging::*;
pub use resolver::*;
pub use writers::*;

/// Top-level faultline configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Exception handler behavior
    #[serde(default)]
    pub handler: HandlerConfig,
    /// Fault resolution policy
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Error-to-field-map conversion
    #[serde(default)]
    pub converter: ConverterConfig,
    /// Body writers, tried in order before the built-in ones
    #[serde(default)]
    pub writers: Vec<WriterConfig>,
}
