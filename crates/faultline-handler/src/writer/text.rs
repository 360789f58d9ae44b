use std::fmt::Write as _;

use faultline_core::ErrorBody;
use mime::Mime;

use super::{BodyWriter, OutputMessage, plain_value};
use crate::error::RenderError;
use crate::negotiation;

static TEXT_PLAIN_UTF_8: Mime = mime::TEXT_PLAIN_UTF_8;

/// Writes bodies as `text/plain`, one `key: value` line per entry
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

#[allow(clippy::unnecessary_literal_bound)]
impl BodyWriter for TextWriter {
    fn name(&self) -> &str {
        "text"
    }

    fn default_media_type(&self) -> &Mime {
        &TEXT_PLAIN_UTF_8
    }

    fn can_write(&self, _body: &ErrorBody, media_type: &Mime) -> bool {
        negotiation::includes(media_type, &mime::TEXT_PLAIN)
    }

    fn write(&self, body: &ErrorBody, media_type: &Mime, output: &mut OutputMessage) -> Result<(), RenderError> {
        let content_type = negotiation::content_type_for(media_type, self.default_media_type());
        output.set_content_type(&content_type)?;

        let mut text = String::new();
        for (key, value) in body.entries() {
            let _ = writeln!(text, "{key}: {}", plain_value(&value));
        }

        output.write_str(&text);
        Ok(())
    }
}
