//! Body writers that serialize an error body as a media type

use bytes::{BufMut, Bytes, BytesMut};
use faultline_config::WriterConfig;
use faultline_core::ErrorBody;
use http::HeaderMap;
use http::header::{CONTENT_TYPE, HeaderValue};
use mime::Mime;

use crate::error::RenderError;

mod form;
mod json;
mod text;

pub use form::FormWriter;
pub use json::JsonWriter;
pub use text::TextWriter;

/// Serializes error bodies as one or more media types
///
/// The exception handler asks writers through [`BodyWriter::can_write`] and
/// invokes the first one that accepts, so `write` only ever sees bodies and
/// media types its check approved.
pub trait BodyWriter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Content type declared when the client accepts a wildcard
    fn default_media_type(&self) -> &Mime;

    /// Whether this writer can serialize `body` as `media_type`
    fn can_write(&self, body: &ErrorBody, media_type: &Mime) -> bool;

    /// Write headers and body to the output
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized
    fn write(&self, body: &ErrorBody, media_type: &Mime, output: &mut OutputMessage) -> Result<(), RenderError>;
}

/// Buffered response headers and body produced by a writer
#[derive(Debug, Default)]
pub struct OutputMessage {
    headers: HeaderMap,
    body: BytesMut,
}

impl OutputMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Declare the body's content type
    ///
    /// # Errors
    ///
    /// Returns an error if the media type is not a valid header value
    pub fn set_content_type(&mut self, media_type: &Mime) -> Result<(), RenderError> {
        let value = HeaderValue::from_str(media_type.as_ref())?;
        self.headers.insert(CONTENT_TYPE, value);
        Ok(())
    }

    /// Writer for the body buffer, for serializers that stream
    pub fn body_writer(&mut self) -> impl std::io::Write + '_ {
        (&mut self.body).writer()
    }

    pub fn write_str(&mut self, text: &str) {
        self.body.put_slice(text.as_bytes());
    }

    pub fn into_parts(self) -> (HeaderMap, Bytes) {
        (self.headers, self.body.freeze())
    }
}

/// Build the configured writers, in the order they are tried
pub fn from_config(configs: &[WriterConfig]) -> Vec<Box<dyn BodyWriter>> {
    configs
        .iter()
        .map(|config| -> Box<dyn BodyWriter> {
            match config {
                WriterConfig::Json(json) => Box::new(JsonWriter::new().pretty(json.pretty).prefix(json.prefix)),
                WriterConfig::Form => Box::new(FormWriter),
                WriterConfig::Text => Box::new(TextWriter),
            }
        })
        .collect()
}

/// Built-in writers, in the order they are tried
pub fn default_writers() -> Vec<Box<dyn BodyWriter>> {
    vec![Box::new(JsonWriter::new()), Box::new(TextWriter)]
}

/// Render a JSON value as plain text
fn plain_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
