//! # Record Checks
//!
//! Rules about the added line itself: its trailing comment and whether it reads as
//! a single `"name": "target"` pair.

use tracing::debug;

use crate::context::CheckContext;
use crate::record::{ExtractedLine, RegistryRecord};
use crate::report::{Finding, Rule};

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

/// Reports a trailing comment on the added line.
///
/// Any comment is reported with the configured `comment_present` severity. A
/// comment that is not one of the allowed annotations also blocks.
pub fn check_comment(ctx: &CheckContext, line: &ExtractedLine) -> Vec<Finding> {
    let Some(comment) = &line.comment else {
        return Vec::new();
    };

    debug!(comment = %comment.raw, "Added line has a comment");

    let mut findings = vec![Finding::new(
        Rule::Comment,
        ctx.config.severities.comment_present,
        format!("Comment added to the cname file: `{}`", comment.raw),
    )];

    if !comment.is_permitted(&ctx.config.registry.allowed_annotations) {
        findings.push(Finding::failure(
            Rule::Comment,
            format!(
                "You are using an invalid comment `{}`, please remove the same.",
                comment.content()
            ),
        ));
    }

    findings
}

/// Returns the parsed record, or the blocking finding explaining why the line
/// could not be parsed.
pub fn check_parse(line: &ExtractedLine) -> Result<&RegistryRecord, Finding> {
    line.record.as_ref().map_err(|e| {
        Finding::failure(
            Rule::Parse,
            format!("Could not parse `{}`: {}", line.fragment, e),
        )
    })
}
