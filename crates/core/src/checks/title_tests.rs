use super::*;
use crate::config::ValidationConfig;
use crate::context::PullRequestContext;
use crate::diff::FileDiff;
use crate::report::Severity;
use crate::restricted::RestrictedNames;

fn context(title: &str) -> CheckContext {
    CheckContext::new(
        PullRequestContext {
            title: title.to_string(),
            ..Default::default()
        },
        FileDiff::default(),
        RestrictedNames::empty(),
        ValidationConfig::default(),
    )
}

fn record(name: &str) -> RegistryRecord {
    RegistryRecord {
        name: name.to_string(),
        target: format!("{}.github.io", name),
    }
}

#[test]
fn test_title_name() {
    assert_eq!(title_name(&context("example.js.org")), Some("example"));
    assert_eq!(title_name(&context("  example.js.org ")), Some("example"));
    assert_eq!(title_name(&context("Add example.js.org")), None);
    assert_eq!(title_name(&context("example.github.io")), None);
}

#[test]
fn test_title_format_valid() {
    let finding = check_title_format(&context("example.js.org"));

    assert_eq!(finding.severity, Severity::Message);
    assert_eq!(finding.message, ":heavy_check_mark: Title of PR: `example.js.org`");
}

#[test]
fn test_title_format_invalid() {
    let finding = check_title_format(&context("Please add my site"));

    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(
        finding.message,
        "Title of Pull Request is not in the format *myawesomeproject.js.org*"
    );
}

#[test]
fn test_title_format_follows_configured_domain() {
    let mut ctx = context("me.is-a.dev");
    ctx.config.registry.domain = "is-a.dev".to_string();
    ctx.config.title_regex = crate::config::title_regex("is-a.dev").unwrap();

    assert_eq!(check_title_format(&ctx).severity, Severity::Message);
}

#[test]
fn test_title_match() {
    assert_eq!(
        check_title_match(&context("example.js.org"), &record("example")),
        None
    );
}

#[test]
fn test_title_mismatch() {
    let finding = check_title_match(&context("example.js.org"), &record("other")).unwrap();

    assert_eq!(finding.rule, Rule::Title);
    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(
        finding.message,
        "Hmmm.. your PR title names `example` but your entry in the file is `other`."
    );
}

#[test]
fn test_title_mismatch_not_reported_for_malformed_title() {
    assert_eq!(
        check_title_match(&context("Add my project"), &record("example")),
        None
    );
}
