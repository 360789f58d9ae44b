use serde::Deserialize;

/// Body writer to register with the exception handler
///
/// Writers are tried in the order they are listed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WriterConfig {
    /// `application/json` and `+json` media types
    Json(JsonWriterConfig),
    /// `application/x-www-form-urlencoded`
    Form,
    /// `text/plain`, one `key: value` line per entry
    Text,
}

/// JSON writer options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonWriterConfig {
    /// Indent the rendered document
    #[serde(default)]
    pub pretty: bool,
    /// Prefix the document with `{} && ` to defeat JSON hijacking
    #[serde(default)]
    pub prefix: bool,
}
