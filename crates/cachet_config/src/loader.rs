//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::CachetConfig;
use std::path::Path;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE: &str = "cachet.toml";

/// Loads and validates a `cachet.toml` configuration from a project directory.
///
/// Reads `<project_dir>/cachet.toml`, parses it, and validates its values.
pub fn load_config(project_dir: &Path) -> Result<CachetConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `cachet.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CachetConfig, ConfigError> {
    let config: CachetConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required values are present and consistent.
fn validate_config(config: &CachetConfig) -> Result<(), ConfigError> {
    if config.assets.source.is_empty() {
        return Err(ConfigError::MissingField("static.source".to_string()));
    }
    if config.assets.destination.is_empty() {
        return Err(ConfigError::MissingField("static.destination".to_string()));
    }
    if !config.assets.base_url.ends_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "static.base_url '{}' must end with '/'",
            config.assets.base_url
        )));
    }
    if config.manifest.path.is_empty() {
        return Err(ConfigError::MissingField("manifest.path".to_string()));
    }
    for (i, rule) in config.postprocess.rewrite.iter().enumerate() {
        if rule.glob.is_empty() {
            return Err(ConfigError::MissingField(format!(
                "postprocess.rewrite[{i}].glob"
            )));
        }
        if rule.pattern.is_empty() {
            return Err(ConfigError::MissingField(format!(
                "postprocess.rewrite[{i}].pattern"
            )));
        }
        if !rule.template.contains("{url}") {
            return Err(ConfigError::ValidationError(format!(
                "postprocess.rewrite[{i}].template must contain '{{url}}'"
            )));
        }
    }
    Ok(())
}
