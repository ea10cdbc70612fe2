use clap::ValueEnum;
use cname_warden_core::report::Report;

use crate::errors::CliError;

/// Authentication commands for configuring GitHub access
pub mod auth;
/// Validation of a local diff without any platform access
pub mod check_diff;
/// Validation of a GitHub pull request
pub mod check_pr;
/// Configuration management commands
pub mod config_cmd;

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// How a validation report is written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One finding per line followed by the summary
    #[default]
    Text,

    /// The Markdown comment that would be posted on the pull request
    Markdown,

    /// The findings and the extracted record as JSON
    Json,
}

/// Renders a report in the requested format.
pub fn render_report(
    report: &Report,
    format: OutputFormat,
    author: &str,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Markdown => Ok(report.to_markdown(author)),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| CliError::Other(format!("Failed to serialize the report: {}", e))),
    }
}

/// Maps a finished report onto the command outcome: blocking findings become
/// [`CliError::ValidationFailed`].
pub fn report_outcome(report: &Report) -> Result<(), CliError> {
    if report.has_failures() {
        Err(CliError::ValidationFailed(report.summary_title()))
    } else {
        Ok(())
    }
}
