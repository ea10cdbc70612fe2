use clap::Subcommand;
use cname_warden_core::config::RulePreset;
use tracing::debug;

use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "config_cmd_tests.rs"]
mod tests;

/// Subcommands for the config command
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Create initial configuration file
    Init {
        /// Path to save the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Check configuration syntax and rule patterns
    Validate {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Show current configuration
    Get {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,

        /// Configuration key to get (e.g., "checks.registry.domain")
        key: Option<String>,
    },

    /// Update configuration values
    Set {
        /// Path to the configuration file
        #[arg(short, long)]
        path: Option<String>,

        /// Configuration key to set (e.g., "checks.rules.preset")
        key: String,

        /// Value to set
        value: String,
    },
}

/// Execute the config command
pub async fn execute(cmd: ConfigCommands) -> Result<(), CliError> {
    match cmd {
        ConfigCommands::Init { path } => init_config(path.as_deref()),
        ConfigCommands::Validate { path } => validate_config(path.as_deref()),
        ConfigCommands::Get { path, key } => get_config(path.as_deref(), key.as_deref()),
        ConfigCommands::Set { path, key, value } => set_config(path.as_deref(), &key, &value),
    }
}

/// Initialize a new configuration file
fn init_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Initializing configuration at {:?}", config_path);

    if config_path.exists() {
        return Err(CliError::ConfigError(format!(
            "Configuration file already exists at {:?}",
            config_path
        )));
    }

    let config = AppConfig::default();
    config.save(&config_path)?;

    println!("Configuration initialized at {:?}", config_path);
    Ok(())
}

/// Validate a configuration file, including the regex patterns it declares
fn validate_config(path: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Validating configuration at {:?}", config_path);

    let config = AppConfig::load(&config_path)?;
    config.checks.to_validation_config()?;

    println!("Configuration is valid");
    Ok(())
}

/// Get a configuration value
fn get_config(path: Option<&str>, key: Option<&str>) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Getting configuration from {:?}", config_path);

    let config = AppConfig::load(&config_path)?;

    if let Some(key) = key {
        let value = get_config_value(&config, key)?;
        println!("{}: {}", key, value);
    } else {
        let config_str = toml::to_string_pretty(&config).map_err(|e| {
            CliError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;
        println!("{}", config_str);
    }

    Ok(())
}

/// Set a configuration value
fn set_config(path: Option<&str>, key: &str, value: &str) -> Result<(), CliError> {
    let config_path = get_config_path(path);
    debug!("Setting configuration at {:?}", config_path);

    let mut config = AppConfig::load_or_default(&config_path)?;
    set_config_value(&mut config, key, value)?;
    config.save(&config_path)?;

    println!("Configuration updated: {} = {}", key, value);
    Ok(())
}

fn invalid_key(key: &str) -> CliError {
    CliError::InvalidArguments(format!("Invalid configuration key: {}", key))
}

fn invalid_value(key: &str, value: &str) -> CliError {
    CliError::InvalidArguments(format!("Invalid value for {}: {}", key, value))
}

fn preset_name(preset: RulePreset) -> &'static str {
    match preset {
        RulePreset::Lenient => "lenient",
        RulePreset::Strict => "strict",
    }
}

/// Get a value from the configuration by key path
fn get_config_value(config: &AppConfig, key: &str) -> Result<String, CliError> {
    let checks = &config.checks;
    let value = match key {
        "default.provider" => config.default.provider.clone(),
        "authentication.auth_method" => config.authentication.auth_method.clone(),
        "checks.registry.active_file" => checks.registry.active_file.clone(),
        "checks.registry.restricted_file" => checks.registry.restricted_file.clone(),
        "checks.registry.domain" => checks.registry.domain.clone(),
        "checks.registry.hosting_patterns" => checks.registry.hosting_patterns.join(", "),
        "checks.registry.allowed_annotations" => checks.registry.allowed_annotations.join(", "),
        "checks.rules.preset" => preset_name(checks.rules.preset).to_string(),
        "checks.rules.stop_on_failure" => checks.rules.stop_on_failure().to_string(),
        "checks.redirect.enabled" => checks.redirect.enabled.to_string(),
        "checks.redirect.timeout_seconds" => checks.redirect.timeout_seconds.to_string(),
        _ => return Err(invalid_key(key)),
    };
    Ok(value)
}

/// Set a value in the configuration by key path
fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), CliError> {
    let checks = &mut config.checks;
    match key {
        "default.provider" => config.default.provider = value.to_string(),
        "authentication.auth_method" => config.authentication.auth_method = value.to_string(),
        "checks.registry.active_file" => checks.registry.active_file = value.to_string(),
        "checks.registry.restricted_file" => checks.registry.restricted_file = value.to_string(),
        "checks.registry.domain" => {
            if value.is_empty() {
                return Err(invalid_value(key, value));
            }
            checks.registry.domain = value.to_string();
        }
        "checks.rules.preset" => {
            checks.rules.preset = match value {
                "lenient" => RulePreset::Lenient,
                "strict" => RulePreset::Strict,
                _ => return Err(invalid_value(key, value)),
            };
        }
        "checks.rules.stop_on_failure" => {
            checks.rules.stop_on_failure = if value.is_empty() {
                None
            } else {
                Some(value.parse().map_err(|_| invalid_value(key, value))?)
            };
        }
        "checks.redirect.enabled" => {
            checks.redirect.enabled = value.parse().map_err(|_| invalid_value(key, value))?;
        }
        "checks.redirect.timeout_seconds" => {
            checks.redirect.timeout_seconds =
                value.parse().map_err(|_| invalid_value(key, value))?;
        }
        _ => return Err(invalid_key(key)),
    }
    Ok(())
}
