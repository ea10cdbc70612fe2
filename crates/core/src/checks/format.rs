//! # Format Checks
//!
//! Targets are bare hosts with an optional path: `user.github.io` or
//! `user.github.io/project`. Contributors often paste a full URL from the browser
//! address bar instead.

use crate::config::{CANONICAL_SHAPE_REGEX, SCHEME_REGEX};
use crate::context::CheckContext;
use crate::record::RegistryRecord;
use crate::report::{Finding, Rule};

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;

/// Blocks a target containing an `http://` or `https://` scheme or ending in `/`.
///
/// # Examples
///
/// ```
/// use cname_warden_core::checks::format::check_target_format;
/// use cname_warden_core::record::RegistryRecord;
///
/// let record = RegistryRecord {
///     name: "example".to_string(),
///     target: "https://example.com/".to_string(),
/// };
/// assert!(check_target_format(&record).is_some());
/// ```
pub fn check_target_format(record: &RegistryRecord) -> Option<Finding> {
    if SCHEME_REGEX.is_match(&record.target) || record.target.ends_with('/') {
        Some(Finding::failure(
            Rule::Formatting,
            format!(
                "The target value `{}` should not start with 'http(s)://' and should not end with a '/'",
                record.target
            ),
        ))
    } else {
        None
    }
}

/// Compares the added line, as written, with the canonical registry line shape
/// `  ,"name": "target"`.
pub fn check_exact_shape(ctx: &CheckContext, raw_line: &str) -> Finding {
    if CANONICAL_SHAPE_REGEX.is_match(raw_line) {
        Finding::message(Rule::ExactShape, ":heavy_check_mark: Exact regex match")
    } else {
        Finding::new(
            Rule::ExactShape,
            ctx.config.severities.exact_shape,
            "Not an *exact* regex match",
        )
    }
}
