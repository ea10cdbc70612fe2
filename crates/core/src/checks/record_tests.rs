use super::*;
use crate::config::ValidationConfig;
use crate::context::PullRequestContext;
use crate::diff::FileDiff;
use crate::record::extract_record;
use crate::report::Severity;
use crate::restricted::RestrictedNames;

fn context() -> CheckContext {
    CheckContext::new(
        PullRequestContext::default(),
        FileDiff::default(),
        RestrictedNames::empty(),
        ValidationConfig::default(),
    )
}

#[test]
fn test_no_comment_no_findings() {
    let line = extract_record(r#"  ,"example": "example.github.io""#);

    assert!(check_comment(&context(), &line).is_empty());
}

#[test]
fn test_permitted_comment_is_reported_but_not_blocking() {
    let line = extract_record(r#"  ,"test": "site.io" // noCF"#);

    let findings = check_comment(&context(), &line);

    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity, Severity::Warning);
    assert_eq!(
        findings[0].message,
        "Comment added to the cname file: `// noCF`"
    );
}

#[test]
fn test_disallowed_comment_blocks() {
    let line = extract_record(r#"  ,"test": "site.io" // please merge"#);

    let findings = check_comment(&context(), &line);

    assert_eq!(findings.len(), 2);
    assert!(findings[1].is_failure());
    assert_eq!(
        findings[1].message,
        "You are using an invalid comment `please merge`, please remove the same."
    );
}

#[test]
fn test_comment_severity_is_configurable() {
    let mut ctx = context();
    ctx.config.severities.comment_present = Severity::Message;
    let line = extract_record(r#"  ,"test": "site.io" // noCF"#);

    let findings = check_comment(&ctx, &line);

    assert_eq!(findings[0].severity, Severity::Message);
}

#[test]
fn test_allowed_annotations_are_configurable() {
    let mut ctx = context();
    ctx.config.registry.allowed_annotations = vec!["keep".to_string()];

    let with_keep = extract_record(r#"  ,"test": "site.io" // keep"#);
    assert!(!check_comment(&ctx, &with_keep).iter().any(Finding::is_failure));

    let with_no_cf = extract_record(r#"  ,"test": "site.io" // noCF"#);
    assert!(check_comment(&ctx, &with_no_cf).iter().any(Finding::is_failure));
}

#[test]
fn test_parse_success() {
    let line = extract_record(r#"  ,"test": "site.io" // noCF"#);

    let record = check_parse(&line).unwrap();

    assert_eq!(record.name, "test");
    assert_eq!(record.target, "site.io");
}

#[test]
fn test_parse_failure_names_fragment_and_cause() {
    let line = extract_record(r#"  ,"test" "site.io""#);

    let finding = check_parse(&line).unwrap_err();

    assert_eq!(finding.rule, Rule::Parse);
    assert!(finding.is_failure());
    assert_eq!(
        finding.message,
        "Could not parse `,\"test\" \"site.io\"`: expected ':' at column 9, found string \"site.io\""
    );
}

#[test]
fn test_parse_failure_for_name_with_space() {
    let line = extract_record(r#"  ,"my site": "site.io""#);

    let finding = check_parse(&line).unwrap_err();

    assert!(finding.is_failure());
    assert!(finding.message.contains("'my site'"));
}
