use super::*;
use async_trait::async_trait;
use cname_warden_core::config::WardenConfig;
use cname_warden_core::redirect::{ProbeResponse, RedirectError};
use cname_warden_core::report::{Rule, Severity};
use indoc::indoc;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Probe that answers with a fixed status and `Location` header.
struct MockProbe {
    status: u16,
    location: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl MockProbe {
    fn new(status: u16, location: Option<&str>) -> Self {
        Self {
            status,
            location: location.map(str::to_string),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RedirectProbe for MockProbe {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, RedirectError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(ProbeResponse {
            status: self.status,
            location: self.location.clone(),
        })
    }
}

const REGISTRY_DIFF: &str = indoc! {r#"
    diff --git a/cnames_active.js b/cnames_active.js
    index 1111111..2222222 100644
    --- a/cnames_active.js
    +++ b/cnames_active.js
    @@ -10,2 +10,3 @@ var cnames_active = {
       ,"aaa": "aaa.github.io"
    +  ,"example": "example.github.io"
       ,"zzz": "zzz.github.io"
"#};

const TWO_FILE_DIFF: &str = indoc! {r#"
    diff --git a/README.md b/README.md
    index 1111111..2222222 100644
    --- a/README.md
    +++ b/README.md
    @@ -1 +1 @@
    -old
    +new
    diff --git a/cnames_active.js b/cnames_active.js
    index 1111111..2222222 100644
    --- a/cnames_active.js
    +++ b/cnames_active.js
    @@ -10,2 +10,3 @@
       ,"aaa": "aaa.io"
    +  ,"example": "example.io"
       ,"zzz": "zzz.io"
"#};

fn config() -> ValidationConfig {
    WardenConfig::default().to_validation_config().unwrap()
}

#[test]
fn test_build_context_from_git_diff() {
    let ctx = build_context(REGISTRY_DIFF, "example.js.org", "octocat", RestrictedNames::empty(), config());

    assert_eq!(ctx.pull_request.modified_files, vec!["cnames_active.js".to_string()]);
    assert!(ctx.pull_request.created_files.is_empty());
    assert_eq!(ctx.pull_request.author, "octocat");
    assert_eq!(ctx.diff.added_lines(), vec![r#"  ,"example": "example.github.io""#]);
}

#[test]
fn test_build_context_from_bare_patch() {
    let patch = "@@ -1,1 +1,2 @@\n   ,\"aaa\": \"aaa.io\"\n+  ,\"bbb\": \"bbb.io\"\n";

    let ctx = build_context(patch, "bbb.js.org", "", RestrictedNames::empty(), config());

    assert_eq!(ctx.pull_request.touched_files(), vec!["cnames_active.js"]);
    assert_eq!(ctx.diff.added_lines().len(), 1);
}

#[test]
fn test_build_context_lists_every_file() {
    let ctx = build_context(TWO_FILE_DIFF, "example.js.org", "", RestrictedNames::empty(), config());

    assert_eq!(ctx.pull_request.touched_files(), vec!["README.md", "cnames_active.js"]);
    assert_eq!(ctx.diff.added_lines(), vec![r#"  ,"example": "example.io""#]);
}

#[tokio::test]
async fn test_check_diff_valid_entry() {
    let probe = MockProbe::new(301, Some("https://example.js.org/"));

    let report = check_diff(
        REGISTRY_DIFF,
        "example.js.org",
        "octocat",
        RestrictedNames::empty(),
        config(),
        &probe,
    )
    .await;

    assert!(!report.has_failures(), "unexpected failures:\n{}", report);
    assert_eq!(report.record().unwrap().name, "example");
    assert_eq!(
        *probe.requests.lock().unwrap(),
        vec!["https://example.github.io".to_string()]
    );
    assert!(report_outcome(&report).is_ok());
}

#[tokio::test]
async fn test_check_diff_disabled_redirect_does_not_probe() {
    let probe = MockProbe::new(404, None);
    let mut config = config();
    config.redirect_enabled = false;

    let report = check_diff(
        REGISTRY_DIFF,
        "example.js.org",
        "",
        RestrictedNames::empty(),
        config,
        &probe,
    )
    .await;

    assert!(probe.requests.lock().unwrap().is_empty());
    assert!(!report.findings().iter().any(|f| f.rule == Rule::Redirect));
}

#[tokio::test]
async fn test_check_diff_restricted_name() {
    let probe = MockProbe::new(301, Some("https://example.js.org"));
    let restricted = RestrictedNames::parse(r#"module.exports = ["example"]"#).unwrap();

    let report = check_diff(
        REGISTRY_DIFF,
        "example.js.org",
        "",
        restricted,
        config(),
        &probe,
    )
    .await;

    assert!(report.failures().any(|f| f.rule == Rule::RestrictedName));
    assert!(matches!(report_outcome(&report), Err(CliError::ValidationFailed(_))));
}

#[tokio::test]
async fn test_check_diff_extra_file_warns() {
    let probe = MockProbe::new(404, None);

    let report = check_diff(
        TWO_FILE_DIFF,
        "example.js.org",
        "",
        RestrictedNames::empty(),
        config(),
        &probe,
    )
    .await;

    let scope = &report.findings()[0];
    assert_eq!(scope.rule, Rule::Scope);
    assert_eq!(scope.severity, Severity::Warning);
    assert!(!report.has_failures(), "unexpected failures:\n{}", report);
}

#[test]
fn test_read_diff_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", REGISTRY_DIFF).unwrap();

    let text = read_diff(file.path().to_str().unwrap()).unwrap();

    assert_eq!(text, REGISTRY_DIFF);
}

#[test]
fn test_read_diff_missing_file() {
    let result = read_diff("/nonexistent/registry.diff");

    assert!(matches!(result, Err(CliError::InvalidArguments(_))));
}

#[test]
fn test_load_restricted() {
    assert!(load_restricted(None).unwrap().is_empty());

    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"module.exports = ["admin(1/2)", "www"]"#).unwrap();
    let names = load_restricted(file.path().to_str()).unwrap();

    assert!(names.contains("admin1"));
    assert!(names.contains("admin2"));
    assert!(names.contains("www"));
}
