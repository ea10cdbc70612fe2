//! # Title Checks
//!
//! Registry pull requests are titled after the subdomain they add, e.g.
//! `myawesomeproject.js.org`.

use crate::context::CheckContext;
use crate::record::RegistryRecord;
use crate::report::{Finding, Rule};

#[cfg(test)]
#[path = "title_tests.rs"]
mod tests;

/// The subdomain named by the pull request title, if the title has the
/// `<name>.<domain>` form.
pub fn title_name(ctx: &CheckContext) -> Option<&str> {
    ctx.config
        .title_regex
        .captures(ctx.pull_request.title.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Checks that the title has the `<name>.<domain>` form.
pub fn check_title_format(ctx: &CheckContext) -> Finding {
    if title_name(ctx).is_some() {
        Finding::message(
            Rule::Title,
            format!(
                ":heavy_check_mark: Title of PR: `{}`",
                ctx.pull_request.title.trim()
            ),
        )
    } else {
        Finding::new(
            Rule::Title,
            ctx.config.severities.title_format,
            format!(
                "Title of Pull Request is not in the format *myawesomeproject.{}*",
                ctx.config.registry.domain
            ),
        )
    }
}

/// Checks that a well-formed title names the added entry.
///
/// A title without the `<name>.<domain>` form is reported by [`check_title_format`]
/// and produces nothing here.
pub fn check_title_match(ctx: &CheckContext, record: &RegistryRecord) -> Option<Finding> {
    let name = title_name(ctx)?;
    if name == record.name {
        return None;
    }

    Some(Finding::new(
        Rule::Title,
        ctx.config.severities.title_mismatch,
        format!(
            "Hmmm.. your PR title names `{}` but your entry in the file is `{}`.",
            name, record.name
        ),
    ))
}
