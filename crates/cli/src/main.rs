//! # CNAME Warden CLI
//!
//! Command-line interface for validating pull requests against a CNAME registry.
//!
//! This binary validates registry pull requests on GitHub or local diffs, manages
//! the configuration file and stores the GitHub token used for API calls.
//!
//! # Commands
//!
//! - `check-pr` - Validate a GitHub pull request and publish the report
//! - `check-diff` - Validate a local diff without contacting GitHub
//! - `config` - Manage configuration files and settings
//! - `auth` - Store a GitHub token in the system keyring
//!
//! # Examples
//!
//! ```bash
//! # Check a pull request
//! cname-warden check-pr --repo js-org/js.org --pr-number 123
//!
//! # Check a local change
//! git diff master | cname-warden check-diff --diff - --title example.js.org
//!
//! # Initialize configuration
//! cname-warden config init
//! ```
//!
//! Log output is controlled with the `CNAME_WARDEN_LOG` environment variable, for
//! example `CNAME_WARDEN_LOG=cname_warden_core=debug`.

#![deny(missing_docs)]

use std::process::{ExitCode, Termination};

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command implementations for the CLI.
mod commands;

/// Configuration management for the CLI.
mod config;

/// Error types specific to the CLI.
mod errors;

use commands::{
    auth::AuthCommands, check_diff::CheckDiffArgs, check_pr::CheckPrArgs,
    config_cmd::ConfigCommands,
};
use errors::CliError;

/// Environment variable holding the log filter
const LOG_ENV_VAR: &str = "CNAME_WARDEN_LOG";

/// Command-line interface structure for CNAME Warden.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands for the CNAME Warden CLI.
#[derive(Subcommand)]
enum Commands {
    /// Validate a GitHub pull request against the registry rules
    #[command(name = "check-pr")]
    CheckPr(CheckPrArgs),

    /// Validate a local diff against the registry rules
    #[command(name = "check-diff")]
    CheckDiff(CheckDiffArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Authenticate with Git providers
    #[command(subcommand)]
    Auth(AuthCommands),
}

/// Installs the tracing subscriber. `--verbose` raises the default level to `debug`
/// when the environment does not set a filter.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Dispatches to the command handler.
async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::CheckPr(args) => commands::check_pr::execute(args).await,
        Commands::CheckDiff(args) => commands::check_diff::execute(args).await,
        Commands::Config(cmd) => commands::config_cmd::execute(cmd).await,
        Commands::Auth(cmd) => commands::auth::execute(cmd).await,
    }
}

/// Main entry point for the CNAME Warden CLI.
///
/// Exits with `0` when the command succeeds and with the code of the
/// [`CliError`] otherwise; a pull request with blocking findings exits with `1`.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            e.report()
        }
    }
}
