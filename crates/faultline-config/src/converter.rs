use serde::Deserialize;

/// Key names used when converting an error into a field map
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    /// Convert errors to a field map before writing
    ///
    /// When disabled, writers receive the resolved error as-is.
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_status_key", alias = "statusKey")]
    pub status_key: String,
    #[serde(default = "default_code_key", alias = "codeKey")]
    pub code_key: String,
    #[serde(default = "default_message_key", alias = "messageKey")]
    pub message_key: String,
    #[serde(default = "default_developer_message_key", alias = "developerMessageKey")]
    pub developer_message_key: String,
    #[serde(default = "default_more_info_url_key", alias = "moreInfoUrlKey")]
    pub more_info_url_key: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            status_key: default_status_key(),
            code_key: default_code_key(),
            message_key: default_message_key(),
            developer_message_key: default_developer_message_key(),
            more_info_url_key: default_more_info_url_key(),
        }
    }
}

impl ConverterConfig {
    /// All key names in render order
    pub fn keys(&self) -> [&str; 5] {
        [
            &self.status_key,
            &self.code_key,
            &self.message_key,
            &self.developer_message_key,
            &self.more_info_url_key,
        ]
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

fn default_status_key() -> String {
    "status".to_owned()
}

fn default_code_key() -> String {
    "code".to_owned()
}

fn default_message_key() -> String {
    "message".to_owned()
}

fn default_developer_message_key() -> String {
    "developerMessage".to_owned()
}

fn default_more_info_url_key() -> String {
    "moreInfoUrl".to_owned()
}
