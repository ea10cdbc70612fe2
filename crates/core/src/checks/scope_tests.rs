use super::*;
use crate::config::{RuleSeverities, ValidationConfig};
use crate::context::PullRequestContext;
use crate::diff::FileDiff;
use crate::report::Severity;
use crate::restricted::RestrictedNames;

fn context(modified: &[&str], created: &[&str], patch: &str) -> CheckContext {
    CheckContext::new(
        PullRequestContext {
            title: "example.js.org".to_string(),
            author: "octocat".to_string(),
            modified_files: modified.iter().map(|s| s.to_string()).collect(),
            created_files: created.iter().map(|s| s.to_string()).collect(),
        },
        FileDiff::parse(patch),
        RestrictedNames::empty(),
        ValidationConfig::default(),
    )
}

const ONE_LINE: &str = "@@ -1 +1,2 @@\n   ,\"a\": \"a.io\"\n+  ,\"b\": \"b.io\"\n";
const TWO_LINES: &str =
    "@@ -1 +1,3 @@\n   ,\"a\": \"a.io\"\n+  ,\"b\": \"b.io\"\n+  ,\"c\": \"c.io\"\n";
const REMOVAL_ONLY: &str = "@@ -1,2 +1 @@\n   ,\"a\": \"a.io\"\n-  ,\"b\": \"b.io\"\n";

#[test]
fn test_scope_only_registry_file() {
    let ctx = context(&["cnames_active.js"], &[], ONE_LINE);

    let finding = check_scope(&ctx);

    assert_eq!(finding.severity, Severity::Message);
    assert_eq!(
        finding.message,
        ":heavy_check_mark: Only file modified is `cnames_active.js`"
    );
}

#[test]
fn test_scope_registry_file_not_modified() {
    let ctx = context(&["README.md"], &[], "");

    let finding = check_scope(&ctx);

    assert!(finding.is_failure());
    assert_eq!(finding.message, "`cnames_active.js` not modified.");
}

#[test]
fn test_scope_other_files_use_configured_severity() {
    let mut ctx = context(&["cnames_active.js", "README.md"], &[], ONE_LINE);

    let lenient = check_scope(&ctx);
    assert_eq!(lenient.severity, Severity::Warning);
    assert_eq!(
        lenient.message,
        "Multiple files modified: cnames_active.js, README.md"
    );

    ctx.config.severities = RuleSeverities::strict();
    assert_eq!(check_scope(&ctx).severity, Severity::Failure);
}

#[test]
fn test_scope_counts_created_files() {
    let ctx = context(&["cnames_active.js"], &["CNAME"], ONE_LINE);

    let finding = check_scope(&ctx);

    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(finding.message, "Multiple files modified: cnames_active.js, CNAME");
}

#[test]
fn test_scope_uses_configured_registry_file() {
    let mut ctx = context(&["domains.json"], &[], ONE_LINE);
    ctx.config.registry.active_file = "domains.json".to_string();

    assert_eq!(check_scope(&ctx).severity, Severity::Message);
}

#[test]
fn test_additions_present() {
    let ctx = context(&["cnames_active.js"], &[], ONE_LINE);

    assert_eq!(check_additions(&ctx), None);
}

#[test]
fn test_additions_missing() {
    let ctx = context(&["cnames_active.js"], &[], REMOVAL_ONLY);

    let finding = check_additions(&ctx).unwrap();

    assert_eq!(finding.rule, Rule::LineCount);
    assert_eq!(finding.severity, Severity::Warning);
    assert_eq!(finding.message, "No lines have been added.");
}

#[test]
fn test_line_count_single_line() {
    let ctx = context(&["cnames_active.js"], &[], ONE_LINE);

    let finding = check_line_count(&ctx);

    assert_eq!(finding.severity, Severity::Message);
    assert_eq!(finding.message, ":heavy_check_mark: Only one line added!");
}

#[test]
fn test_line_count_more_than_one_line() {
    let ctx = context(&["cnames_active.js"], &[], TWO_LINES);

    let finding = check_line_count(&ctx);

    assert!(finding.is_failure());
    assert_eq!(finding.message, "More than one line added! Found 2 added lines.");
}
