//! # Check Reports
//!
//! This module provides the result types produced by the registry checks.
//!
//! Every rule reports a [`Finding`] with a [`Severity`] instead of returning early,
//! so a single run gives the contributor the full list of problems with their entry.
//! The [`Report`] collects the findings in evaluation order and renders them for the
//! console and for the pull request comment.

use indoc::formatdoc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SUMMARY_COMMENT_MARKER;
use crate::record::RegistryRecord;

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// How strongly a finding affects the outcome of the check.
///
/// Only [`Severity::Failure`] blocks the pull request. Warnings are shown to the
/// contributor and reviewers but never change the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; usually a rule that passed
    Message,

    /// Advisory; does not block the pull request
    Warning,

    /// Blocking
    Failure,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Message => "message",
            Severity::Warning => "warning",
            Severity::Failure => "failure",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The rule that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    /// Which files the pull request touches
    Scope,
    /// Number of added registry lines
    LineCount,
    /// Trailing line comment on the added entry
    Comment,
    /// Whether the added line is a single `"name": "target"` pair
    Parse,
    /// Scheme prefix and trailing slash in the target
    Formatting,
    /// Canonical textual shape of the added line
    ExactShape,
    /// Correlation between the pull request title and the entry name
    Title,
    /// Whether the hosted target redirects back to the registry domain
    Redirect,
    /// Alphabetical order of the entries around the change
    Ordering,
    /// Adjacent entries with the same name
    Duplicate,
    /// Names reserved by the registry maintainers
    RestrictedName,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Scope => "scope",
            Rule::LineCount => "line-count",
            Rule::Comment => "comment",
            Rule::Parse => "parse",
            Rule::Formatting => "formatting",
            Rule::ExactShape => "exact-shape",
            Rule::Title => "title",
            Rule::Redirect => "redirect",
            Rule::Ordering => "ordering",
            Rule::Duplicate => "duplicate",
            Rule::RestrictedName => "restricted-name",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub rule: Rule,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn new(rule: Rule, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity,
            message: message.into(),
        }
    }

    pub fn message(rule: Rule, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Message, message)
    }

    pub fn warning(rule: Rule, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Warning, message)
    }

    pub fn failure(rule: Rule, message: impl Into<String>) -> Self {
        Self::new(rule, Severity::Failure, message)
    }

    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.rule, self.message)
    }
}

/// Findings of one validation run, in evaluation order.
///
/// # Examples
///
/// ```
/// use cname_warden_core::report::{Finding, Report, Rule};
///
/// let mut report = Report::new();
/// report.push(Finding::message(Rule::LineCount, "Only one line added!"));
/// report.push(Finding::warning(Rule::ExactShape, "Not an *exact* regex match"));
///
/// assert!(!report.has_failures());
/// assert_eq!(report.conclusion(), "success");
/// assert_eq!(report.warnings().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    findings: Vec<Finding>,
    record: Option<RegistryRecord>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// The record extracted from the added line, if it could be parsed.
    pub fn record(&self) -> Option<&RegistryRecord> {
        self.record.as_ref()
    }

    pub fn set_record(&mut self, record: RegistryRecord) {
        self.record = Some(record);
    }

    pub fn failures(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Failure)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Warning)
    }

    pub fn messages(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Message)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn has_failures(&self) -> bool {
        self.findings.iter().any(Finding::is_failure)
    }

    /// Check-run conclusion for the report: `failure` if any finding blocks, otherwise `success`.
    pub fn conclusion(&self) -> &'static str {
        if self.has_failures() {
            "failure"
        } else {
            "success"
        }
    }

    /// One-line summary used as the check-run title.
    pub fn summary_title(&self) -> String {
        let failures = self.failures().count();
        let warnings = self.warnings().count();
        match (failures, warnings) {
            (0, 0) => "All registry checks passed".to_string(),
            (0, w) => format!("Registry checks passed with {} warning(s)", w),
            (f, w) => format!("{} failure(s), {} warning(s)", f, w),
        }
    }

    /// Renders the report as the Markdown body of the pull request comment.
    ///
    /// The comment starts with [`SUMMARY_COMMENT_MARKER`] so a later run can find and
    /// replace it. When `author` is not empty the comment ends with a greeting
    /// addressed to them.
    pub fn to_markdown(&self, author: &str) -> String {
        let mut sections = Vec::new();
        for (heading, severity) in [
            ("Failures", Severity::Failure),
            ("Warnings", Severity::Warning),
            ("Messages", Severity::Message),
        ] {
            let items: Vec<String> = self
                .with_severity(severity)
                .map(|f| format!("- {}", f.message))
                .collect();
            if !items.is_empty() {
                sections.push(format!("#### {}\n\n{}", heading, items.join("\n")));
            }
        }

        let mut body = format!(
            "{}\n### {}\n\n{}",
            SUMMARY_COMMENT_MARKER,
            self.summary_title(),
            sections.join("\n\n")
        );

        if !author.is_empty() {
            body.push_str("\n\n");
            body.push_str(&formatdoc!(
                "@{author} Hey, thanks for opening this PR! \
                <br>I've taken the liberty of running a few tests, you can see the results above :)"
            ));
        }

        body
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{}", finding)?;
        }
        write!(f, "{}", self.summary_title())
    }
}
