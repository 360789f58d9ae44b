use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

/// Default fault resolution policy
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Status for faults with no mapping and no status of their own
    #[serde(default = "default_status")]
    pub default_status: u16,
    /// Resolve unmapped faults with `default_status`
    ///
    /// When disabled, unmapped faults are left for the host to handle.
    #[serde(default = "default_true")]
    pub handle_unmapped: bool,
    /// Message for unmapped faults; omitted from the body when unset
    #[serde(default)]
    pub default_message: Option<String>,
    /// Fill `developerMessage` from the fault's error chain when a mapping
    /// does not configure one
    #[serde(default)]
    pub developer_messages: bool,
    /// Fault kind to status or error template
    #[serde(default)]
    pub mappings: IndexMap<String, MappingDefinition>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_status: default_status(),
            handle_unmapped: true,
            default_message: None,
            developer_messages: false,
            mappings: IndexMap::new(),
        }
    }
}

/// Mapping target for a fault kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MappingDefinition {
    /// Bare status code, message taken from the fault
    Status(u16),
    /// Pre-built error template
    Template(ErrorTemplateConfig),
}

impl MappingDefinition {
    /// Status this mapping resolves to
    pub const fn status(&self) -> u16 {
        match self {
            Self::Status(status) => *status,
            Self::Template(template) => template.status,
        }
    }
}

/// Error template fields
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorTemplateConfig {
    pub status: u16,
    /// Application-specific code; zero leaves it unset
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub developer_message: Option<String>,
    #[serde(default)]
    pub more_info_url: Option<Url>,
}

const fn default_status() -> u16 {
    500
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}
