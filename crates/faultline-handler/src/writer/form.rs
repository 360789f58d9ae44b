use faultline_core::{BodyShape, ErrorBody};
use mime::Mime;

use super::{BodyWriter, OutputMessage, plain_value};
use crate::error::RenderError;
use crate::negotiation;

static FORM_URLENCODED: Mime = mime::APPLICATION_WWW_FORM_URLENCODED;

/// Writes bodies as `application/x-www-form-urlencoded` pairs
///
/// Only converted field maps are written. A raw error carries no configured
/// key names, so it is declined and left to the next writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormWriter;

#[allow(clippy::unnecessary_literal_bound)]
impl BodyWriter for FormWriter {
    fn name(&self) -> &str {
        "form"
    }

    fn default_media_type(&self) -> &Mime {
        &FORM_URLENCODED
    }

    fn can_write(&self, body: &ErrorBody, media_type: &Mime) -> bool {
        body.shape() == BodyShape::Fields && negotiation::includes(media_type, &mime::APPLICATION_WWW_FORM_URLENCODED)
    }

    fn write(&self, body: &ErrorBody, media_type: &Mime, output: &mut OutputMessage) -> Result<(), RenderError> {
        let content_type = negotiation::content_type_for(media_type, self.default_media_type());
        output.set_content_type(&content_type)?;

        let pairs: Vec<(String, String)> = body
            .entries()
            .into_iter()
            .map(|(key, value)| (key.into_owned(), plain_value(&value)))
            .collect();

        output.write_str(&serde_urlencoded::to_string(pairs)?);
        Ok(())
    }
}
