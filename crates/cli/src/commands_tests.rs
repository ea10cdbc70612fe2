use super::*;
use cname_warden_core::report::{Finding, Rule};

fn sample_report(with_failure: bool) -> Report {
    let mut report = Report::new();
    report.push(Finding::message(
        Rule::LineCount,
        ":heavy_check_mark: Only one line added!",
    ));
    if with_failure {
        report.push(Finding::failure(Rule::Ordering, "The list is no longer in alphabetic order"));
    }
    report
}

#[test]
fn test_render_report_text() {
    let report = sample_report(false);

    let text = render_report(&report, OutputFormat::Text, "octocat").unwrap();

    assert!(text.contains("Only one line added!"));
    assert!(text.ends_with("All registry checks passed"));
    assert!(!text.contains("@octocat"));
}

#[test]
fn test_render_report_markdown() {
    let report = sample_report(true);

    let markdown = render_report(&report, OutputFormat::Markdown, "octocat").unwrap();

    assert!(markdown.contains("#### Failures"));
    assert!(markdown.contains("@octocat"));
}

#[test]
fn test_render_report_json() {
    let report = sample_report(true);

    let json = render_report(&report, OutputFormat::Json, "octocat").unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["findings"].as_array().unwrap().len(), 2);
    assert_eq!(value["findings"][1]["rule"], "ordering");
}

#[test]
fn test_report_outcome() {
    assert!(report_outcome(&sample_report(false)).is_ok());

    match report_outcome(&sample_report(true)) {
        Err(CliError::ValidationFailed(summary)) => assert_eq!(summary, "1 failure(s), 0 warning(s)"),
        other => panic!("Expected a validation failure, got {:?}", other),
    }
}
