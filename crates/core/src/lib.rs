//! # CNAME Warden Core
//!
//! Validation of pull requests against a domain-redirection registry such as the
//! `cnames_active.js` file of js.org.
//!
//! A registry pull request is expected to add exactly one `"name": "target"` line
//! to the registry file. CNAME Warden reads the diff of that file, extracts the
//! added record and runs a set of rules over it:
//! - only the registry file is changed, and only one line is added
//! - the line parses as a single record and carries no comment other than `noCF`
//! - the target is a bare host without scheme or trailing slash
//! - the pull request title names the record
//! - a hosted target redirects back to its registry subdomain
//! - the entries around the change stay in alphabetical order without duplicates
//! - the name is not reserved
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cname_warden_core::{CnameWarden, redirect::HttpRedirectProbe};
//! use cname_warden_developer_platforms::{FileContentFetcher, PullRequestProvider};
//! use std::time::Duration;
//!
//! async fn validate_pr<P>(provider: P) -> Result<(), Box<dyn std::error::Error>>
//! where
//!     P: PullRequestProvider + FileContentFetcher + std::fmt::Debug,
//! {
//!     let probe = HttpRedirectProbe::new(Duration::from_secs(10))?;
//!     let warden = CnameWarden::new(provider, probe);
//!
//!     let report = warden.process_pull_request("js-org", "js.org", 123).await?;
//!     if report.has_failures() {
//!         println!("The pull request needs changes:\n{}", report);
//!     }
//!
//!     Ok(())
//! }
//! ```

use cname_warden_developer_platforms::models::{PullRequest, PullRequestFile};
use cname_warden_developer_platforms::{FileContentFetcher, PullRequestProvider};
use tracing::{debug, info, instrument, warn};

pub mod checks;

pub mod config;
use config::{ValidationConfig, SUMMARY_COMMENT_MARKER};

pub mod context;
use context::{CheckContext, PullRequestContext};

pub mod diff;
use diff::FileDiff;

pub mod errors;
use errors::WardenError;

pub mod record;
use record::extract_record;

pub mod redirect;
use redirect::RedirectProbe;

pub mod report;
use report::Report;

pub mod restricted;
use restricted::RestrictedNames;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Returns `true` when evaluation has to stop because a blocking finding was reported
/// and the configuration asks to stop at the first one.
fn halted(ctx: &CheckContext, report: &Report) -> bool {
    let halt = ctx.config.stop_on_failure && report.has_failures();
    if halt {
        debug!("Stopping after the first failure");
    }
    halt
}

/// Runs every registry rule over the context and collects the findings.
///
/// Rules run in a fixed order. A registry diff without added lines ends the run
/// early, as does an added line that cannot be parsed. When
/// [`ValidationConfig::stop_on_failure`] is set the run also ends after the first
/// blocking finding.
///
/// The only side effect is the redirect probe; running the checks twice against
/// the same target responses gives the same report.
#[instrument(skip(ctx, probe), fields(title = %ctx.pull_request.title))]
pub async fn run_checks<R>(ctx: &CheckContext, probe: &R) -> Report
where
    R: RedirectProbe + ?Sized,
{
    let mut report = Report::new();

    report.push(checks::scope::check_scope(ctx));
    if halted(ctx, &report) {
        return report;
    }

    if let Some(finding) = checks::scope::check_additions(ctx) {
        info!("The registry diff adds no lines, nothing to validate");
        report.push(finding);
        return report;
    }

    report.push(checks::title::check_title_format(ctx));
    report.push(checks::scope::check_line_count(ctx));
    if halted(ctx, &report) {
        return report;
    }

    let added = ctx.diff.added_lines();
    let Some(first_line) = added.first() else {
        return report;
    };
    let line = extract_record(first_line);

    report.extend(checks::record::check_comment(ctx, &line));
    if halted(ctx, &report) {
        return report;
    }

    let record = match checks::record::check_parse(&line) {
        Ok(record) => record.clone(),
        Err(finding) => {
            info!(fragment = %line.fragment, "Added line could not be parsed");
            report.push(finding);
            return report;
        }
    };
    debug!(record = ?record, "Extracted registry record");
    report.set_record(record.clone());

    report.extend(checks::format::check_target_format(&record));
    report.push(checks::format::check_exact_shape(ctx, &line.raw));
    report.extend(checks::title::check_title_match(ctx, &record));
    if halted(ctx, &report) {
        return report;
    }

    report.extend(checks::redirect::check_redirect(ctx, &record, probe).await);
    if halted(ctx, &report) {
        return report;
    }

    report.extend(checks::ordering::check_ordering(ctx));
    if halted(ctx, &report) {
        return report;
    }

    report.extend(checks::restricted::check_restricted_name(ctx, &record));

    info!(
        failures = report.failures().count(),
        warnings = report.warnings().count(),
        "Registry checks completed"
    );
    report
}

/// Validates registry pull requests hosted on a developer platform.
///
/// `CnameWarden` gathers the inputs of a run (pull request, changed files, the
/// registry diff and the restricted-name list) from the platform, runs the checks
/// and reports back on the pull request with a summary comment and a check run.
///
/// # Examples
///
/// ```rust,no_run
/// use cname_warden_core::{CnameWarden, config::WardenConfig, redirect::HttpRedirectProbe};
/// use cname_warden_developer_platforms::{FileContentFetcher, PullRequestProvider};
/// use std::time::Duration;
///
/// async fn example<P>(provider: P) -> Result<(), Box<dyn std::error::Error>>
/// where
///     P: PullRequestProvider + FileContentFetcher + std::fmt::Debug,
/// {
///     let config = WardenConfig::default().to_validation_config()?;
///     let probe = HttpRedirectProbe::new(config.redirect_timeout)?;
///     let warden = CnameWarden::with_config(provider, probe, config).with_publish_results(false);
///
///     let report = warden.process_pull_request("owner", "repo", 123).await?;
///     println!("{}", report);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct CnameWarden<P, R>
where
    P: PullRequestProvider + FileContentFetcher + std::fmt::Debug,
    R: RedirectProbe + std::fmt::Debug,
{
    provider: P,
    probe: R,
    config: ValidationConfig,
    publish_results: bool,
}

impl<P, R> CnameWarden<P, R>
where
    P: PullRequestProvider + FileContentFetcher + std::fmt::Debug,
    R: RedirectProbe + std::fmt::Debug,
{
    /// Creates a new `CnameWarden` with the default js.org configuration.
    ///
    /// # Arguments
    ///
    /// * `provider` - Access to the platform hosting the registry repository
    /// * `probe` - Used to verify the redirect of hosted targets
    pub fn new(provider: P, probe: R) -> Self {
        Self::with_config(provider, probe, ValidationConfig::default())
    }

    /// Creates a new `CnameWarden` with a custom configuration.
    pub fn with_config(provider: P, probe: R, config: ValidationConfig) -> Self {
        Self {
            provider,
            probe,
            config,
            publish_results: true,
        }
    }

    /// Whether the report is posted back to the pull request. Enabled by default.
    pub fn with_publish_results(mut self, publish_results: bool) -> Self {
        self.publish_results = publish_results;
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Collects the inputs of a run for the given pull request.
    ///
    /// The restricted-name list is read from the branch the pull request targets so
    /// that a pull request cannot lift a restriction by editing the list.
    #[instrument]
    pub async fn build_context(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr: &PullRequest,
    ) -> Result<CheckContext, WardenError> {
        let files = self
            .provider
            .get_pull_request_files(repo_owner, repo_name, pr.number)
            .await
            .map_err(|e| WardenError::GitProviderError(e.to_string()))?;
        debug!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr.number,
            count = files.len(),
            "Retrieved changed files",
        );

        let pull_request = PullRequestContext {
            title: pr.title.clone(),
            author: pr.author_login().to_string(),
            modified_files: files
                .iter()
                .filter(|f| !f.is_added())
                .map(|f| f.filename.clone())
                .collect(),
            created_files: files
                .iter()
                .filter(|f| f.is_added())
                .map(|f| f.filename.clone())
                .collect(),
        };

        let diff = self.registry_diff(&files);
        let restricted = self
            .load_restricted_names(repo_owner, repo_name, &pr.base_ref)
            .await?;

        Ok(CheckContext::new(
            pull_request,
            diff,
            restricted,
            self.config.clone(),
        ))
    }

    fn registry_diff(&self, files: &[PullRequestFile]) -> FileDiff {
        let active_file = &self.config.registry.active_file;
        match files.iter().find(|f| &f.filename == active_file) {
            Some(PullRequestFile {
                patch: Some(patch), ..
            }) => FileDiff::parse(patch),
            Some(_) => {
                warn!(
                    file = %active_file,
                    "The platform reported no patch for the registry file"
                );
                FileDiff::default()
            }
            None => FileDiff::default(),
        }
    }

    async fn load_restricted_names(
        &self,
        repo_owner: &str,
        repo_name: &str,
        reference: &str,
    ) -> Result<RestrictedNames, WardenError> {
        let path = &self.config.registry.restricted_file;
        let content = self
            .provider
            .fetch_file(repo_owner, repo_name, path, reference)
            .await
            .map_err(|e| WardenError::GitProviderError(e.to_string()))?;

        match content {
            Some(content) => Ok(RestrictedNames::parse(&content)?),
            None => {
                warn!(
                    repository_owner = repo_owner,
                    repository = repo_name,
                    file = %path,
                    reference,
                    "Restricted name file not found, no names are restricted"
                );
                Ok(RestrictedNames::empty())
            }
        }
    }

    /// Replaces the previous summary comment with the report and publishes the
    /// check run.
    #[instrument(skip(report))]
    async fn publish_report(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr: &PullRequest,
        report: &Report,
    ) -> Result<(), WardenError> {
        let comments = self
            .provider
            .list_comments(repo_owner, repo_name, pr.number)
            .await
            .unwrap_or_default();

        for comment in comments
            .iter()
            .filter(|c| c.body.contains(SUMMARY_COMMENT_MARKER))
        {
            self.provider
                .delete_comment(repo_owner, repo_name, comment.id)
                .await
                .map_err(|_| {
                    WardenError::FailedToUpdatePullRequest(
                        "Failed to remove comment".to_string(),
                    )
                })?;
            debug!(
                repository_owner = repo_owner,
                repository = repo_name,
                pull_request = pr.number,
                comment = comment.id,
                "Removed previous summary comment"
            );
        }

        let body = report.to_markdown(pr.author_login());
        self.provider
            .add_comment(repo_owner, repo_name, pr.number, &body)
            .await
            .map_err(|_| {
                WardenError::FailedToUpdatePullRequest("Failed to add comment".to_string())
            })?;

        self.provider
            .update_pr_check_status(
                repo_owner,
                repo_name,
                pr.number,
                report.conclusion(),
                &report.summary_title(),
                &body,
            )
            .await
            .map_err(|e| WardenError::FailedToUpdatePullRequest(e.to_string()))?;

        info!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr.number,
            conclusion = report.conclusion(),
            "Published registry check results"
        );
        Ok(())
    }

    /// Validates a pull request and, unless disabled, reports the result on it.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    ///
    /// # Returns
    ///
    /// The [`Report`] of the run. Blocking findings are part of the report, not
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns a [`WardenError`] when the platform cannot be read or updated, or the
    /// restricted-name list is malformed.
    #[instrument]
    pub async fn process_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Report, WardenError> {
        info!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            "Processing pull request"
        );

        let pr = self
            .provider
            .get_pull_request(repo_owner, repo_name, pr_number)
            .await
            .map_err(|e| WardenError::GitProviderError(e.to_string()))?;

        let ctx = self.build_context(repo_owner, repo_name, &pr).await?;
        let report = run_checks(&ctx, &self.probe).await;

        if self.publish_results {
            self.publish_report(repo_owner, repo_name, &pr, &report)
                .await?;
        } else {
            debug!(
                repository_owner = repo_owner,
                repository = repo_name,
                pull_request = pr_number,
                "Not publishing results"
            );
        }

        Ok(report)
    }
}
