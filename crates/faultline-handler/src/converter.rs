//! `RestError` to renderable body conversion

use faultline_config::ConverterConfig;
use faultline_core::{ErrorBody, RestError};
use indexmap::IndexMap;
use serde_json::Value;

use crate::error::RenderError;

/// Turns a resolved error into the body handed to writers
pub trait RestErrorConverter: Send + Sync {
    /// Build the body for `error`
    ///
    /// # Errors
    ///
    /// Returns an error if the representation cannot be built; the handler
    /// then leaves the fault unhandled
    fn convert(&self, error: &RestError) -> Result<ErrorBody, RenderError>;
}

/// Key names used in the converted field map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorKeys {
    pub status: String,
    pub code: String,
    pub message: String,
    pub developer_message: String,
    pub more_info_url: String,
}

impl Default for ErrorKeys {
    fn default() -> Self {
        Self {
            status: "status".to_owned(),
            code: "code".to_owned(),
            message: "message".to_owned(),
            developer_message: "developerMessage".to_owned(),
            more_info_url: "moreInfoUrl".to_owned(),
        }
    }
}

impl From<&ConverterConfig> for ErrorKeys {
    fn from(config: &ConverterConfig) -> Self {
        Self {
            status: config.status_key.clone(),
            code: config.code_key.clone(),
            message: config.message_key.clone(),
            developer_message: config.developer_message_key.clone(),
            more_info_url: config.more_info_url_key.clone(),
        }
    }
}

/// Converts errors into an ordered field map
///
/// `status` is always present. `code` appears only when positive and the
/// remaining fields only when set.
#[derive(Debug, Clone, Default)]
pub struct MapRestErrorConverter {
    keys: ErrorKeys,
}

impl MapRestErrorConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_keys(keys: ErrorKeys) -> Self {
        Self { keys }
    }

    /// Build from the `[converter]` config section
    ///
    /// Returns `None` when conversion is disabled, in which case writers
    /// receive the raw error.
    pub fn from_config(config: &ConverterConfig) -> Option<Self> {
        config.enabled.then(|| Self::with_keys(ErrorKeys::from(config)))
    }

    pub const fn keys(&self) -> &ErrorKeys {
        &self.keys
    }
}

impl RestErrorConverter for MapRestErrorConverter {
    fn convert(&self, error: &RestError) -> Result<ErrorBody, RenderError> {
        let mut fields = IndexMap::with_capacity(5);

        fields.insert(self.keys.status.clone(), Value::from(error.status().as_u16()));

        if let Some(code) = error.code() {
            fields.insert(self.keys.code.clone(), Value::from(code));
        }
        if let Some(message) = error.message() {
            fields.insert(self.keys.message.clone(), Value::from(message));
        }
        if let Some(message) = error.developer_message() {
            fields.insert(self.keys.developer_message.clone(), Value::from(message));
        }
        if let Some(url) = error.more_info_url() {
            fields.insert(self.keys.more_info_url.clone(), Value::from(url));
        }

        Ok(ErrorBody::Fields(fields))
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::*;

    fn fields(body: ErrorBody) -> IndexMap<String, Value> {
        match body {
            ErrorBody::Fields(fields) => fields,
            ErrorBody::Error(_) => panic!("expected a field map"),
        }
    }

    fn full_error() -> RestError {
        RestError::builder(StatusCode::NOT_FOUND)
            .code(1402)
            .message("Unable to find user with username 'foo'")
            .developer_message("users table has no row for 'foo'")
            .more_info_url("https://example.com/errors/1402")
            .build()
    }

    #[test]
    fn status_only_error() {
        let body = MapRestErrorConverter::new()
            .convert(&RestError::new(StatusCode::INTERNAL_SERVER_ERROR))
            .unwrap();

        let fields = fields(body);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["status"], 500);
    }

    #[test]
    fn full_error_in_wire_order() {
        let body = MapRestErrorConverter::new().convert(&full_error()).unwrap();
        insta::assert_snapshot!(
            serde_json::to_string(&body).unwrap(),
            @r#"{"status":404,"code":1402,"message":"Unable to find user with username 'foo'","developerMessage":"users table has no row for 'foo'","moreInfoUrl":"https://example.com/errors/1402"}"#
        );
    }

    #[test]
    fn zero_code_is_omitted() {
        let error = RestError::builder(StatusCode::BAD_REQUEST)
            .code(0)
            .message("bad input")
            .build();
        let fields = fields(MapRestErrorConverter::new().convert(&error).unwrap());

        assert!(!fields.contains_key("code"));
        assert_eq!(fields["message"], "bad input");
    }

    #[test]
    fn keys_carry_exactly_the_present_values() {
        let error = RestError::builder(StatusCode::CONFLICT)
            .code(9)
            .more_info_url("https://example.com/errors/9")
            .build();
        let fields = fields(MapRestErrorConverter::new().convert(&error).unwrap());

        let keys: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["status", "code", "moreInfoUrl"]);
        assert_eq!(fields["status"], 409);
        assert_eq!(fields["code"], 9);
        assert_eq!(fields["moreInfoUrl"], "https://example.com/errors/9");
    }

    #[test]
    fn converting_twice_is_stable() {
        let converter = MapRestErrorConverter::new();
        let error = full_error();
        assert_eq!(converter.convert(&error).unwrap(), converter.convert(&error).unwrap());
    }

    #[test]
    fn configured_key_names() {
        let config = ConverterConfig {
            status_key: "httpStatus".to_owned(),
            message_key: "error".to_owned(),
            ..ConverterConfig::default()
        };
        let converter = MapRestErrorConverter::from_config(&config).unwrap();

        let error = RestError::builder(StatusCode::NOT_FOUND).message("gone").build();
        let fields = fields(converter.convert(&error).unwrap());

        let keys: Vec<_> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["httpStatus", "error"]);
    }

    #[test]
    fn disabled_conversion_yields_no_converter() {
        let config = ConverterConfig {
            enabled: false,
            ..ConverterConfig::default()
        };
        assert!(MapRestErrorConverter::from_config(&config).is_none());
    }
}
