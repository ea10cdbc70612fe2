//! # Ordering Check
//!
//! Registry entries are kept in ascending alphabetical order of their names. Only
//! the lines visible in the diff are compared: each hunk's resulting lines (context
//! and added, without removals) must be in order on their own.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::ENTRY_NAME_REGEX;
use crate::context::CheckContext;
use crate::record::split_line_comment;
use crate::report::{Finding, Rule};

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod tests;

/// Punctuation in collation order; anything else sorts after these by code point.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary collation weight of a character: punctuation, then digits, then letters
/// regardless of case.
fn primary_weight(c: char) -> (u8, u32) {
    if c.is_alphabetic() {
        let folded = c.to_lowercase().next().unwrap_or(c);
        (2, folded as u32)
    } else if c.is_numeric() {
        (1, c as u32)
    } else {
        let rank = PUNCTUATION_ORDER
            .chars()
            .position(|p| p == c)
            .map_or(PUNCTUATION_ORDER.len() as u32 + c as u32, |i| i as u32);
        (0, rank)
    }
}

/// Case-insensitive comparison in the style of a locale collation.
///
/// Characters are compared by their primary weight first: punctuation sorts
/// before digits and digits before letters, with letters compared case-folded.
/// Names that only differ in case sort lowercase first, and anything still equal
/// falls back to a plain byte comparison, so the result is a total order.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use cname_warden_core::checks::ordering::locale_compare;
///
/// assert_eq!(locale_compare("alpha", "Beta"), Ordering::Less);
/// assert_eq!(locale_compare("beta", "Beta"), Ordering::Less);
/// assert_eq!(locale_compare("a_b", "a1"), Ordering::Less);
/// assert_eq!(locale_compare("beta", "beta"), Ordering::Equal);
/// ```
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| s.chars().map(primary_weight).collect::<Vec<_>>();
    let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();

    primary(a)
        .cmp(&primary(b))
        .then_with(|| case(a).cmp(&case(b)))
        .then_with(|| a.cmp(b))
}

/// The entry name of a registry line: the first quoted key, ignoring any trailing
/// comment. Lines without a key (braces, blank lines) have none.
pub fn entry_name(line: &str) -> Option<&str> {
    let (body, _) = split_line_comment(line);
    ENTRY_NAME_REGEX
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Checks the order of the entries around the change.
///
/// Adjacent entries with identical names are each reported as duplicates. The first
/// pair out of order is reported and ends the check.
pub fn check_ordering(ctx: &CheckContext) -> Vec<Finding> {
    let mut findings = Vec::new();

    'hunks: for hunk in ctx.diff.hunks() {
        let names: Vec<&str> = hunk.resulting_lines().filter_map(entry_name).collect();
        debug!(
            new_start = hunk.new_start,
            entries = names.len(),
            "Checking entry order"
        );

        for pair in names.windows(2) {
            let (previous, current) = (pair[0], pair[1]);

            if previous == current {
                findings.push(Finding::failure(
                    Rule::Duplicate,
                    format!(
                        "`{}.{}` already exists.",
                        current, ctx.config.registry.domain
                    ),
                ));
                continue;
            }

            if locale_compare(previous, current) == Ordering::Greater {
                findings.push(Finding::failure(
                    Rule::Ordering,
                    format!(
                        "The list is no longer in alphabetic order: `{}` should come before `{}`.",
                        current, previous
                    ),
                ));
                break 'hunks;
            }
        }
    }

    if findings.is_empty() {
        findings.push(Finding::message(
            Rule::Ordering,
            ":heavy_check_mark: Entries are in alphabetic order",
        ));
    }

    findings
}
