use clap::Subcommand;
use keyring::Entry;
use tracing::debug;

use crate::config::{get_config_path, AppConfig};
use crate::errors::CliError;

pub const KEY_RING_SERVICE_NAME: &str = "cname_warden_cli";
pub const KEY_RING_USER_TOKEN: &str = "github_token";

/// Environment variable that overrides the token stored in the keyring
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Subcommands for the auth command
#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store a GitHub personal access token in the system keyring
    #[command(name = "github")]
    GitHub {
        /// Authentication method
        #[arg(default_value = "token")]
        method: String,
    },
}

/// Execute the auth command
pub async fn execute(cmd: AuthCommands) -> Result<(), CliError> {
    match cmd {
        AuthCommands::GitHub { method } => auth_github(&method).await,
    }
}

/// Authenticate with GitHub
async fn auth_github(method: &str) -> Result<(), CliError> {
    debug!("Authenticating with GitHub using method: {}", method);

    if method != "token" {
        return Err(CliError::InvalidArguments(format!(
            "Unsupported authentication method: {}",
            method
        )));
    }

    let config_path = get_config_path(None);
    let mut config = AppConfig::load_or_default(&config_path)?;

    println!("GitHub Personal Access Token Authentication");
    println!("------------------------------------------");
    println!("Please provide your GitHub Personal Access Token:");

    let mut token = String::new();
    std::io::stdin()
        .read_line(&mut token)
        .map_err(|e| CliError::AuthError(format!("Failed to read input: {}", e)))?;
    let token = token.trim();

    if token.is_empty() {
        return Err(CliError::AuthError("Token cannot be empty".to_string()));
    }

    keyring_entry()?
        .set_password(token)
        .map_err(|e| CliError::AuthError(format!("Failed to save token to keyring: {}", e)))?;

    config.authentication.auth_method = "token".to_string();
    config.save(&config_path)?;

    println!("GitHub token authentication configured successfully!");
    Ok(())
}

fn keyring_entry() -> Result<Entry, CliError> {
    Entry::new(KEY_RING_SERVICE_NAME, KEY_RING_USER_TOKEN).map_err(|e| {
        CliError::AuthError(format!("Failed to create an entry in the keyring: {}", e))
    })
}

/// Finds the GitHub token to use for API calls.
///
/// `GITHUB_TOKEN` takes precedence; otherwise the token stored by `auth github` is
/// read from the system keyring.
pub fn resolve_github_token(config: &AppConfig) -> Result<String, CliError> {
    if config.authentication.auth_method != "token" {
        return Err(CliError::InvalidArguments(format!(
            "Unsupported authentication method: {}",
            config.authentication.auth_method
        )));
    }

    if let Ok(token) = std::env::var(GITHUB_TOKEN_ENV) {
        if !token.trim().is_empty() {
            debug!("Using GitHub token from {}", GITHUB_TOKEN_ENV);
            return Ok(token.trim().to_string());
        }
    }

    debug!("Reading GitHub token from the keyring");
    keyring_entry()?.get_password().map_err(|e| {
        CliError::AuthError(format!(
            "No GitHub token found. Set {} or run `cname-warden auth github`: {}",
            GITHUB_TOKEN_ENV, e
        ))
    })
}
