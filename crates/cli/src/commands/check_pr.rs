use clap::Args;
use cname_warden_core::redirect::HttpRedirectProbe;
use cname_warden_core::CnameWarden;
use cname_warden_developer_platforms::github::{create_token_client, GitHubProvider};
use tracing::{debug, error, info, instrument};

use crate::commands::auth::resolve_github_token;
use crate::commands::{render_report, report_outcome, OutputFormat};
use crate::config::{get_config_path, resolve_warden_config, AppConfig};
use crate::errors::CliError;

#[cfg(test)]
#[path = "check_pr_tests.rs"]
mod tests;

/// Arguments for the check-pr command
#[derive(Args, Debug)]
pub struct CheckPrArgs {
    /// Repository in `owner/repo` form
    #[arg(short, long)]
    pub repo: String,

    /// Number of the pull request to validate
    #[arg(short = 'n', long)]
    pub pr_number: u64,

    /// Alternate config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Standalone rules file overriding the `[checks]` section of the config
    #[arg(long)]
    pub rules: Option<String>,

    /// Print the report without commenting on the pull request
    #[arg(long)]
    pub no_publish: bool,

    /// Output format of the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Splits `owner/repo` into its two parts.
pub fn parse_repository(repo: &str) -> Result<(&str, &str), CliError> {
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok((owner, name))
        }
        _ => Err(CliError::InvalidArguments(format!(
            "Repository must be given as owner/repo, got '{}'",
            repo
        ))),
    }
}

/// Executes the `check-pr` command.
///
/// Fetches the pull request from GitHub, validates it and, unless `--no-publish` is
/// given, replaces the summary comment and updates the check status. The command
/// fails with [`CliError::ValidationFailed`] when the report contains a blocking
/// finding.
#[instrument(skip(args), fields(repo = %args.repo, pr = args.pr_number))]
pub async fn execute(args: CheckPrArgs) -> Result<(), CliError> {
    let (owner, repo) = parse_repository(&args.repo)?;

    let app_config = AppConfig::load_or_default(&get_config_path(args.config.as_deref()))?;
    let warden_config = resolve_warden_config(args.config.as_deref(), args.rules.as_deref())?;
    let validation_config = warden_config.to_validation_config()?;

    let token = resolve_github_token(&app_config)?;
    let client = create_token_client(&token).map_err(|e| {
        error!(message = "Failed to create the GitHub client", error = ?e);
        CliError::AuthError(format!("Failed to create the GitHub client: {}", e))
    })?;
    let provider = GitHubProvider::new(client);

    let probe = HttpRedirectProbe::new(validation_config.redirect_timeout)
        .map_err(|e| CliError::PipelineError(e.to_string()))?;

    debug!("Validating pull request");
    let warden = CnameWarden::with_config(provider, probe, validation_config)
        .with_publish_results(!args.no_publish);
    let report = warden
        .process_pull_request(owner, repo, args.pr_number)
        .await?;

    info!(
        failures = report.failures().count(),
        warnings = report.warnings().count(),
        "Pull request validated"
    );

    println!("{}", render_report(&report, args.format, "")?);
    report_outcome(&report)
}
