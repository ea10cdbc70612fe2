//! # Restricted Names
//!
//! Names the registry maintainers reserve. The list lives in its own file next to
//! the registry (`cnames_restricted.js` for js.org), typically as a JavaScript
//! array of strings:
//!
//! ```text
//! module.exports = [
//!   "about",
//!   "admin(1/2)",
//! ]
//! ```
//!
//! An entry `base(s1/s2)` reserves `base`, `base` + `s1` and `base` + `s2`.

use std::collections::BTreeSet;

use tracing::debug;

use crate::errors::RestrictedNamesError;
use crate::record::split_line_comment;

#[cfg(test)]
#[path = "restricted_tests.rs"]
mod tests;

/// Immutable set of reserved names, built once per run.
///
/// # Examples
///
/// ```
/// use cname_warden_core::restricted::RestrictedNames;
///
/// let names = RestrictedNames::parse(r#"module.exports = ["www", "admin(1/2)"]"#).unwrap();
///
/// assert!(names.contains("admin"));
/// assert!(names.contains("admin1"));
/// assert!(names.contains("admin2"));
/// assert!(!names.contains("admin3"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestrictedNames {
    names: BTreeSet<String>,
}

impl RestrictedNames {
    /// A set that restricts nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Reads the restricted-name file.
    ///
    /// Every double-quoted string literal outside a line comment is one entry. A
    /// file without any quotes is read as a plain list: one entry per non-empty line,
    /// skipping lines that start with `//` or `#`.
    ///
    /// # Errors
    ///
    /// Returns a [`RestrictedNamesError`] for an entry whose suffix group is malformed.
    pub fn parse(content: &str) -> Result<Self, RestrictedNamesError> {
        let entries = if content.contains('"') {
            quoted_entries(content)
        } else {
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with("//") && !l.starts_with('#'))
                .map(str::to_string)
                .collect()
        };

        let names = Self::from_entries(entries.iter().map(String::as_str))?;
        debug!(
            entries = entries.len(),
            names = names.len(),
            "Loaded restricted names"
        );
        Ok(names)
    }

    /// Expands each `base(s1/s2)` entry into the names it reserves.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, RestrictedNamesError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut names = BTreeSet::new();
        for entry in entries {
            names.extend(expand_entry(entry)?);
        }
        Ok(Self { names })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

fn quoted_entries(content: &str) -> Vec<String> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let (body, _) = split_line_comment(line);
        let mut rest = body;
        while let Some(start) = rest.find('"') {
            let after = &rest[start + 1..];
            let Some(len) = closing_quote(after) else {
                break;
            };
            let literal = &rest[start..start + len + 2];
            match serde_json::from_str::<String>(literal) {
                Ok(value) => entries.push(value),
                Err(e) => debug!(literal, error = %e, "Skipping undecodable string literal"),
            }
            rest = &after[len + 1..];
        }
    }

    entries
}

/// Byte length of the string body up to (not including) its closing quote.
fn closing_quote(after_open: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in after_open.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some(i),
            _ => {}
        }
    }
    None
}

fn expand_entry(entry: &str) -> Result<Vec<String>, RestrictedNamesError> {
    let entry = entry.trim();
    let Some(open) = entry.find('(') else {
        if entry.contains(')') {
            return Err(RestrictedNamesError::UnbalancedSuffixGroup {
                entry: entry.to_string(),
            });
        }
        if entry.is_empty() {
            return Ok(Vec::new());
        }
        return Ok(vec![entry.to_string()]);
    };

    let base = &entry[..open];
    let Some(close) = entry[open..].find(')').map(|i| open + i) else {
        return Err(RestrictedNamesError::UnbalancedSuffixGroup {
            entry: entry.to_string(),
        });
    };

    if close + 1 != entry.len() {
        return Err(RestrictedNamesError::TrailingContent {
            entry: entry.to_string(),
        });
    }

    if base.is_empty() {
        return Err(RestrictedNamesError::EmptyBase {
            entry: entry.to_string(),
        });
    }

    let mut names = vec![base.to_string()];
    for suffix in entry[open + 1..close].split('/') {
        if !suffix.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(RestrictedNamesError::InvalidSuffix {
                entry: entry.to_string(),
                suffix: suffix.to_string(),
            });
        }
        if !suffix.is_empty() {
            names.push(format!("{}{}", base, suffix));
        }
    }

    Ok(names)
}
