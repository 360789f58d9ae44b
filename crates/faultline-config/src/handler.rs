use serde::Deserialize;

/// Exception handler behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerConfig {
    /// Handler names the exception handler applies to
    ///
    /// Empty applies to every handler, including requests that never
    /// reached one.
    #[serde(default)]
    pub mapped_handlers: Vec<String>,
    /// Mark rendered error responses with `Cache-Control: no-store`
    #[serde(default)]
    pub prevent_response_caching: bool,
    /// Append the built-in JSON and text writers after the configured ones
    #[serde(default = "default_true")]
    pub default_writers: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            mapped_handlers: Vec::new(),
            prevent_response_caching: false,
            default_writers: true,
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}
