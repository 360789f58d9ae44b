use faultline_core::ErrorBody;
use mime::Mime;

use super::{BodyWriter, OutputMessage};
use crate::error::RenderError;
use crate::negotiation;

static APPLICATION_JSON: Mime = mime::APPLICATION_JSON;

/// Prefix that makes a JSON document invalid as a script
const HIJACK_PREFIX: &str = "{} && ";

/// Writes bodies as `application/json` or any `+json` media type
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct JsonWriter {
    pretty: bool,
    prefix: bool,
}

impl JsonWriter {
    pub const fn new() -> Self {
        Self {
            pretty: false,
            prefix: false,
        }
    }

    /// Indent the rendered document
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Prefix the document with `{} && `
    pub const fn prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }
}

#[allow(clippy::unnecessary_literal_bound)]
impl BodyWriter for JsonWriter {
    fn name(&self) -> &str {
        "json"
    }

    fn default_media_type(&self) -> &Mime {
        &APPLICATION_JSON
    }

    fn can_write(&self, _body: &ErrorBody, media_type: &Mime) -> bool {
        if negotiation::includes(media_type, &mime::APPLICATION_JSON) {
            return true;
        }

        // Structured syntax suffix, e.g. `application/problem+json`
        media_type.type_() == mime::APPLICATION && media_type.suffix() == Some(mime::JSON)
    }

    fn write(&self, body: &ErrorBody, media_type: &Mime, output: &mut OutputMessage) -> Result<(), RenderError> {
        let content_type = negotiation::content_type_for(media_type, self.default_media_type());
        output.set_content_type(&content_type)?;

        if self.prefix {
            output.write_str(HIJACK_PREFIX);
        }

        if self.pretty {
            serde_json::to_writer_pretty(output.body_writer(), body)?;
        } else {
            serde_json::to_writer(output.body_writer(), body)?;
        }

        Ok(())
    }
}
