use http::StatusCode;
use serde::{Serialize, Serializer};

/// Description of a failed request, rendered as the response body
///
/// Only `status` is required. Unset optional fields are omitted from every
/// serialized form rather than emitted as null. Instances are immutable;
/// use [`RestError::builder`] to construct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestError {
    #[serde(serialize_with = "serialize_status")]
    status: StatusCode,
    #[serde(skip_serializing_if = "is_unset")]
    code: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    developer_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    more_info_url: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_status<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_unset(code: &u32) -> bool {
    *code == 0
}

impl RestError {
    /// Start building an error with the given status
    pub const fn builder(status: StatusCode) -> RestErrorBuilder {
        RestErrorBuilder {
            error: Self {
                status,
                code: 0,
                message: None,
                developer_message: None,
                more_info_url: None,
            },
        }
    }

    /// Error with only a status
    pub fn new(status: StatusCode) -> Self {
        Self::builder(status).build()
    }

    /// HTTP status of the response
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Application-specific error code, if set
    pub const fn code(&self) -> Option<u32> {
        if self.code == 0 { None } else { Some(self.code) }
    }

    /// Message safe to show to API consumers
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Message aimed at developers, not guaranteed safe for end users
    pub fn developer_message(&self) -> Option<&str> {
        self.developer_message.as_deref()
    }

    /// URL of documentation about this error
    pub fn more_info_url(&self) -> Option<&str> {
        self.more_info_url.as_deref()
    }
}

/// Builder for [`RestError`]
#[derive(Debug, Clone)]
#[must_use]
pub struct RestErrorBuilder {
    error: RestError,
}

impl RestErrorBuilder {
    /// Application-specific code; zero leaves it unset
    pub const fn code(mut self, code: u32) -> Self {
        self.error.code = code;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.error.message = Some(message.into());
        self
    }

    pub fn developer_message(mut self, message: impl Into<String>) -> Self {
        self.error.developer_message = Some(message.into());
        self
    }

    pub fn more_info_url(mut self, url: impl Into<String>) -> Self {
        self.error.more_info_url = Some(url.into());
        self
    }

    /// Set the message only when one is given
    pub fn maybe_message(mut self, message: Option<String>) -> Self {
        if message.is_some() {
            self.error.message = message;
        }
        self
    }

    /// Set the developer message only when one is given
    pub fn maybe_developer_message(mut self, message: Option<String>) -> Self {
        if message.is_some() {
            self.error.developer_message = message;
        }
        self
    }

    /// Set the more-info URL only when one is given
    pub fn maybe_more_info_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.error.more_info_url = url;
        }
        self
    }

    pub fn build(self) -> RestError {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_only_serializes_status() {
        let error = RestError::new(StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"status":500}"#);
    }

    #[test]
    fn full_error_serializes_in_field_order() {
        let error = RestError::builder(StatusCode::NOT_FOUND)
            .code(1402)
            .message("Unable to find user with username 'foo'")
            .developer_message("lookup returned no rows")
            .more_info_url("https://example.com/errors/1402")
            .build();

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(
            json,
            r#"{"status":404,"code":1402,"message":"Unable to find user with username 'foo'","developerMessage":"lookup returned no rows","moreInfoUrl":"https://example.com/errors/1402"}"#
        );
    }

    #[test]
    fn zero_code_reads_as_unset() {
        let error = RestError::builder(StatusCode::BAD_REQUEST).code(0).build();
        assert_eq!(error.code(), None);
    }

    #[test]
    fn maybe_setters_keep_previous_value_on_none() {
        let error = RestError::builder(StatusCode::CONFLICT)
            .message("first")
            .maybe_message(None)
            .maybe_more_info_url(Some("https://example.com".to_owned()))
            .build();

        assert_eq!(error.message(), Some("first"));
        assert_eq!(error.more_info_url(), Some("https://example.com"));
        assert_eq!(error.developer_message(), None);
    }
}
