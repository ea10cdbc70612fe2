use std::fs;
use std::io::Read;

use clap::Args;
use cname_warden_core::config::ValidationConfig;
use cname_warden_core::context::{CheckContext, PullRequestContext};
use cname_warden_core::diff::{changed_files, FileDiff};
use cname_warden_core::redirect::{HttpRedirectProbe, RedirectProbe};
use cname_warden_core::report::Report;
use cname_warden_core::restricted::RestrictedNames;
use cname_warden_core::run_checks;
use tracing::{debug, info, instrument, warn};

use crate::commands::{render_report, report_outcome, OutputFormat};
use crate::config::resolve_warden_config;
use crate::errors::CliError;

#[cfg(test)]
#[path = "check_diff_tests.rs"]
mod tests;

/// Arguments for the check-diff command
#[derive(Args, Debug)]
pub struct CheckDiffArgs {
    /// Unified diff to validate, or `-` to read it from stdin
    #[arg(short, long)]
    pub diff: String,

    /// Title of the pull request the diff belongs to
    #[arg(short, long)]
    pub title: String,

    /// Login of the pull request author, used in the Markdown greeting
    #[arg(short, long, default_value = "")]
    pub author: String,

    /// Restricted-name file to check the entry against
    #[arg(long)]
    pub restricted: Option<String>,

    /// Alternate config file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Standalone rules file overriding the `[checks]` section of the config
    #[arg(long)]
    pub rules: Option<String>,

    /// Skip the redirect check for hosted targets
    #[arg(long)]
    pub no_redirect: bool,

    /// Output format of the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Reads the diff from a file, or from stdin when the path is `-`.
fn read_diff(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CliError::InvalidArguments(format!("Failed to read the diff from stdin: {}", e)))?;
        return Ok(text);
    }

    fs::read_to_string(path)
        .map_err(|e| CliError::InvalidArguments(format!("Failed to read the diff '{}': {}", path, e)))
}

/// Loads the restricted names, or an empty set when no file is given.
fn load_restricted(path: Option<&str>) -> Result<RestrictedNames, CliError> {
    let Some(path) = path else {
        return Ok(RestrictedNames::empty());
    };

    let content = fs::read_to_string(path).map_err(|e| {
        CliError::InvalidArguments(format!("Failed to read the restricted names '{}': {}", path, e))
    })?;
    RestrictedNames::parse(&content).map_err(|e| {
        CliError::InvalidArguments(format!("Invalid restricted names file '{}': {}", path, e))
    })
}

/// Builds the check context for a local diff.
///
/// The file list comes from the diff headers. A bare patch without headers is taken
/// to be the patch of the registry file alone.
pub fn build_context(
    diff_text: &str,
    title: &str,
    author: &str,
    restricted: RestrictedNames,
    config: ValidationConfig,
) -> CheckContext {
    let mut pull_request = PullRequestContext {
        title: title.to_string(),
        author: author.to_string(),
        ..Default::default()
    };

    let files = changed_files(diff_text);
    if files.is_empty() {
        debug!("Diff has no file headers, treating it as the registry patch");
        pull_request
            .modified_files
            .push(config.registry.active_file.clone());
    }
    for file in files {
        if file.created {
            pull_request.created_files.push(file.path);
        } else {
            pull_request.modified_files.push(file.path);
        }
    }

    let diff = FileDiff::for_path(diff_text, &config.registry.active_file);
    CheckContext::new(pull_request, diff, restricted, config)
}

/// Validates a local diff with the given probe.
pub async fn check_diff<R>(
    diff_text: &str,
    title: &str,
    author: &str,
    restricted: RestrictedNames,
    config: ValidationConfig,
    probe: &R,
) -> Report
where
    R: RedirectProbe + ?Sized,
{
    let ctx = build_context(diff_text, title, author, restricted, config);
    run_checks(&ctx, probe).await
}

/// Executes the `check-diff` command.
///
/// Runs the registry checks over a local diff without contacting GitHub. Only the
/// redirect check reaches the network, and `--no-redirect` turns it off.
#[instrument(skip(args), fields(title = %args.title))]
pub async fn execute(args: CheckDiffArgs) -> Result<(), CliError> {
    let warden_config = resolve_warden_config(args.config.as_deref(), args.rules.as_deref())?;
    let mut config = warden_config.to_validation_config()?;
    if args.no_redirect {
        info!("Redirect check disabled");
        config.redirect_enabled = false;
    }

    let diff_text = read_diff(&args.diff)?;
    if diff_text.trim().is_empty() {
        warn!("The diff is empty");
    }
    let restricted = load_restricted(args.restricted.as_deref())?;

    let probe = HttpRedirectProbe::new(config.redirect_timeout)
        .map_err(|e| CliError::PipelineError(e.to_string()))?;

    let report = check_diff(&diff_text, &args.title, &args.author, restricted, config, &probe).await;

    println!("{}", render_report(&report, args.format, &args.author)?);
    report_outcome(&report)
}
