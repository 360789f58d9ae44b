use std::collections::HashSet;
use std::path::Path;

use crate::Config;

/// Statuses the resolver may emit
const STATUS_RANGE: std::ops::RangeInclusive<u16> = 100..=599;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, placeholder expansion
    /// fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if placeholder expansion, parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if a status is outside 100-599, a mapping kind is
    /// empty, or converter key names are empty or collide
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_resolver()?;
        self.validate_converter()?;
        self.validate_handler()?;
        Ok(())
    }

    fn validate_resolver(&self) -> anyhow::Result<()> {
        let resolver = &self.resolver;

        if !STATUS_RANGE.contains(&resolver.default_status) {
            anyhow::bail!(
                "resolver.default_status {} is outside {}-{}",
                resolver.default_status,
                STATUS_RANGE.start(),
                STATUS_RANGE.end()
            );
        }

        for (kind, mapping) in &resolver.mappings {
            if kind.trim_matches('.').is_empty() {
                anyhow::bail!("resolver mapping kinds must not be empty");
            }

            let status = mapping.status();
            if !STATUS_RANGE.contains(&status) {
                anyhow::bail!("status {status} for mapping '{kind}' is outside 100-599");
            }
        }

        Ok(())
    }

    fn validate_converter(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();

        for key in self.converter.keys() {
            if key.is_empty() {
                anyhow::bail!("converter key names must not be empty");
            }
            if !seen.insert(key) {
                anyhow::bail!("converter key '{key}' is used for more than one field");
            }
        }

        Ok(())
    }

    fn validate_handler(&self) -> anyhow::Result<()> {
        if self.handler.mapped_handlers.iter().any(|name| name.trim().is_empty()) {
            anyhow::bail!("handler.mapped_handlers must not contain empty names");
        }

        if self.writers.is_empty() && !self.handler.default_writers {
            anyhow::bail!("no body writers configured and handler.default_writers is disabled");
        }

        Ok(())
    }
}
