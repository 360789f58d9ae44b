use std::borrow::Cow;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::RestError;

/// Renderable payload handed to body writers
///
/// Serializes transparently: a field map renders as an object in insertion
/// order, a raw error renders with its own field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorBody {
    /// Ordered key/value pairs produced by a converter
    Fields(IndexMap<String, Value>),
    /// The resolved error itself, used when no converter is configured
    Error(RestError),
}

/// Runtime shape of an [`ErrorBody`]
///
/// Writers check it in `can_write` when they support only one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    Fields,
    Error,
}

impl ErrorBody {
    pub const fn shape(&self) -> BodyShape {
        match self {
            Self::Fields(_) => BodyShape::Fields,
            Self::Error(_) => BodyShape::Error,
        }
    }

    /// Entries in render order
    ///
    /// A raw error yields its default camel-case field names.
    pub fn entries(&self) -> Vec<(Cow<'_, str>, Value)> {
        match self {
            Self::Fields(fields) => fields
                .iter()
                .map(|(key, value)| (Cow::Borrowed(key.as_str()), value.clone()))
                .collect(),
            Self::Error(error) => {
                let mut entries = vec![(Cow::Borrowed("status"), Value::from(error.status().as_u16()))];
                if let Some(code) = error.code() {
                    entries.push((Cow::Borrowed("code"), Value::from(code)));
                }
                if let Some(message) = error.message() {
                    entries.push((Cow::Borrowed("message"), Value::from(message)));
                }
                if let Some(message) = error.developer_message() {
                    entries.push((Cow::Borrowed("developerMessage"), Value::from(message)));
                }
                if let Some(url) = error.more_info_url() {
                    entries.push((Cow::Borrowed("moreInfoUrl"), Value::from(url)));
                }
                entries
            }
        }
    }
}
