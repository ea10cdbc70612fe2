use std::{
    fs,
    path::{Path, PathBuf},
};

use cname_warden_core::config::WardenConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::CliError;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = ".cname-warden.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Configuration for the CNAME Warden CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default settings
    #[serde(default)]
    pub default: DefaultConfig,

    #[serde(default)]
    pub authentication: AuthenticationConfig,

    /// Registry and rule settings used by the checks
    #[serde(default)]
    pub checks: WardenConfig,
}

impl AppConfig {
    /// Load configuration from the specified file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(CliError::ConfigError(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CliError::ConfigError(format!("Failed to read configuration file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            CliError::ConfigError(format!("Failed to parse configuration file: {}", e))
        })?;

        Ok(config)
    }

    /// Load the configuration if the file exists, otherwise use the defaults
    pub fn load_or_default(path: &Path) -> Result<Self, CliError> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to the specified file
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self).map_err(|e| {
            CliError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CliError::ConfigError(format!("Failed to create directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            CliError::ConfigError(format!("Failed to write configuration file: {}", e))
        })?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

/// How the CLI authenticates with the platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationConfig {
    #[serde(default = "AuthenticationConfig::default_auth_method")]
    pub auth_method: String,
}

impl AuthenticationConfig {
    fn default_auth_method() -> String {
        "token".to_string()
    }
}

impl Default for AuthenticationConfig {
    fn default() -> Self {
        Self {
            auth_method: AuthenticationConfig::default_auth_method(),
        }
    }
}

/// Default configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Default Git provider
    #[serde(default = "DefaultConfig::default_provider")]
    pub provider: String,
}

impl DefaultConfig {
    fn default_provider() -> String {
        "github".to_string()
    }
}

impl Default for DefaultConfig {
    fn default() -> Self {
        Self {
            provider: DefaultConfig::default_provider(),
        }
    }
}

/// Get the path to the configuration file
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        // Look for config in current directory
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}

/// Resolves the check configuration for a command.
///
/// A standalone rules file given with `--rules` wins over the `[checks]` section of
/// the CLI configuration file.
pub fn resolve_warden_config(
    config_path: Option<&str>,
    rules_path: Option<&str>,
) -> Result<WardenConfig, CliError> {
    if let Some(rules_path) = rules_path {
        debug!("Loading rules from {}", rules_path);
        return Ok(cname_warden_core::config::load_warden_config(rules_path)?);
    }

    let app_config = AppConfig::load_or_default(&get_config_path(config_path))?;
    Ok(app_config.checks)
}
