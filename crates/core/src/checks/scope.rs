//! # Scope Checks
//!
//! A registry pull request changes the registry file and nothing else, and adds
//! exactly one line to it.

use tracing::debug;

use crate::context::CheckContext;
use crate::report::{Finding, Rule};

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;

/// Checks which files the pull request modifies or creates.
///
/// Not touching the registry file always blocks. Touching other files as well is
/// reported with the configured `scope` severity.
pub fn check_scope(ctx: &CheckContext) -> Finding {
    let active_file = ctx.config.registry.active_file.as_str();
    let touched = ctx.pull_request.touched_files();
    debug!(files = ?touched, "Checking pull request scope");

    if !touched.contains(&active_file) {
        return Finding::failure(Rule::Scope, format!("`{}` not modified.", active_file));
    }

    if touched.len() == 1 {
        return Finding::message(
            Rule::Scope,
            format!(":heavy_check_mark: Only file modified is `{}`", active_file),
        );
    }

    Finding::new(
        Rule::Scope,
        ctx.config.severities.scope,
        format!("Multiple files modified: {}", touched.join(", ")),
    )
}

/// Returns a finding when the registry diff adds nothing, in which case there is no
/// entry to validate.
pub fn check_additions(ctx: &CheckContext) -> Option<Finding> {
    if ctx.diff.added_lines().is_empty() {
        Some(Finding::new(
            Rule::LineCount,
            ctx.config.severities.no_additions,
            "No lines have been added.",
        ))
    } else {
        None
    }
}

/// Checks that exactly one registry line is added.
pub fn check_line_count(ctx: &CheckContext) -> Finding {
    match ctx.diff.added_lines().len() {
        0 => Finding::new(
            Rule::LineCount,
            ctx.config.severities.no_additions,
            "No lines have been added.",
        ),
        1 => Finding::message(Rule::LineCount, ":heavy_check_mark: Only one line added!"),
        count => Finding::failure(
            Rule::LineCount,
            format!("More than one line added! Found {} added lines.", count),
        ),
    }
}
