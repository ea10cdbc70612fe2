//! # Diff Parsing
//!
//! Reads unified diff text for the registry file and classifies every line as
//! added, removed or context.
//!
//! Two inputs are supported: the full output of `git diff` (possibly covering many
//! files, with `diff --git` / `---` / `+++` headers) and the header-less hunk text a
//! platform reports as the `patch` of a single file.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;

lazy_static! {
    static ref HUNK_HEADER_REGEX: Regex =
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@")
            .expect("Failed to compile hunk header regex");
}

const FILE_HEADER_PREFIX: &str = "diff --git ";
const NEW_FILE_PREFIX: &str = "+++ ";
const OLD_FILE_PREFIX: &str = "--- ";
const NEW_FILE_MODE_PREFIX: &str = "new file mode";
const DEV_NULL: &str = "/dev/null";

/// Classification of a line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Added,
    Removed,
    Context,
}

/// One line of a hunk with its diff marker stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: LineKind,
    pub text: String,
}

/// A contiguous block of changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// First line of the hunk in the original file
    pub old_start: u32,

    /// First line of the hunk in the resulting file
    pub new_start: u32,

    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn added_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.kind == LineKind::Added)
            .map(|l| l.text.as_str())
    }

    /// Context and added lines in file order, i.e. the hunk as it reads after the change.
    pub fn resulting_lines(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .filter(|l| l.kind != LineKind::Removed)
            .map(|l| l.text.as_str())
    }
}

/// Parsed diff of a single file.
///
/// An empty `FileDiff` means the file was not changed; this is a valid state.
///
/// # Examples
///
/// ```
/// use cname_warden_core::diff::FileDiff;
///
/// let diff = FileDiff::parse(
///     "@@ -1,2 +1,3 @@\n   ,\"a\": \"a.github.io\"\n+  ,\"b\": \"b.github.io\"\n   ,\"c\": \"c.github.io\"\n",
/// );
///
/// assert_eq!(diff.added_lines(), vec!["  ,\"b\": \"b.github.io\""]);
/// assert_eq!(diff.resulting_lines().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiff {
    hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Parses unified diff text for exactly one file.
    ///
    /// File headers are skipped, as is any text outside a hunk and the
    /// `\ No newline at end of file` marker.
    pub fn parse(text: &str) -> Self {
        let mut hunks = Vec::new();
        let mut current: Option<Hunk> = None;
        let mut remaining_old = 0u32;
        let mut remaining_new = 0u32;

        for raw_line in text.lines() {
            if let Some(captures) = HUNK_HEADER_REGEX.captures(raw_line) {
                if let Some(hunk) = current.take() {
                    hunks.push(hunk);
                }

                let number = |index: usize, default: u32| {
                    captures
                        .get(index)
                        .and_then(|m| m.as_str().parse::<u32>().ok())
                        .unwrap_or(default)
                };
                remaining_old = number(2, 1);
                remaining_new = number(4, 1);
                current = Some(Hunk {
                    old_start: number(1, 0),
                    new_start: number(3, 0),
                    lines: Vec::new(),
                });
                continue;
            }

            let Some(hunk) = current.as_mut() else {
                continue;
            };

            if raw_line.starts_with('\\') {
                continue;
            }

            if remaining_old == 0 && remaining_new == 0 {
                hunks.extend(current.take());
                continue;
            }

            let (kind, text) = match raw_line.chars().next() {
                Some('+') => (LineKind::Added, &raw_line[1..]),
                Some('-') => (LineKind::Removed, &raw_line[1..]),
                Some(' ') => (LineKind::Context, &raw_line[1..]),
                // Some tools strip the single space of an empty context line
                None => (LineKind::Context, ""),
                Some(_) => {
                    hunks.extend(current.take());
                    continue;
                }
            };

            match kind {
                LineKind::Added => remaining_new = remaining_new.saturating_sub(1),
                LineKind::Removed => remaining_old = remaining_old.saturating_sub(1),
                LineKind::Context => {
                    remaining_old = remaining_old.saturating_sub(1);
                    remaining_new = remaining_new.saturating_sub(1);
                }
            }

            hunk.lines.push(DiffLine {
                kind,
                text: text.trim_end_matches('\r').to_string(),
            });
        }

        hunks.extend(current);

        debug!(hunks = hunks.len(), "Parsed file diff");
        Self { hunks }
    }

    /// Selects the section of a multi-file diff that changes `path` and parses it.
    ///
    /// Text without any file header is taken to be the patch of `path` itself. If the
    /// diff has file headers but none of them names `path`, the result is empty.
    pub fn for_path(text: &str, path: &str) -> Self {
        let sections = split_sections(text);
        if sections.len() == 1 && section_path(sections[0]).is_none() {
            return Self::parse(sections[0]);
        }

        sections
            .into_iter()
            .find(|section| section_path(section).as_deref() == Some(path))
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.iter().all(|h| h.lines.is_empty())
    }

    /// Added lines across all hunks, in file order.
    pub fn added_lines(&self) -> Vec<&str> {
        self.hunks.iter().flat_map(Hunk::added_lines).collect()
    }

    /// Context and added lines across all hunks, in file order.
    pub fn resulting_lines(&self) -> Vec<&str> {
        self.hunks.iter().flat_map(Hunk::resulting_lines).collect()
    }
}

/// A file named by the headers of a multi-file diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,

    /// The diff creates the file
    pub created: bool,
}

/// Lists the files changed by a multi-file `git diff`, in diff order.
pub fn changed_files(text: &str) -> Vec<ChangedFile> {
    split_sections(text)
        .into_iter()
        .filter_map(|section| {
            let path = section_path(section)?;
            let created = section
                .lines()
                .take_while(|l| !l.starts_with("@@"))
                .any(|l| {
                    l.starts_with(NEW_FILE_MODE_PREFIX)
                        || (l.starts_with(OLD_FILE_PREFIX)
                            && header_path(&l[OLD_FILE_PREFIX.len()..]).is_none())
                });
            Some(ChangedFile { path, created })
        })
        .collect()
}

fn split_sections(text: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.starts_with(FILE_HEADER_PREFIX) {
            starts.push(offset);
        }
        offset += line.len();
    }

    if starts.is_empty() {
        return vec![text];
    }

    let mut sections = Vec::with_capacity(starts.len());
    for (i, start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        sections.push(&text[*start..end]);
    }
    sections
}

/// Path the section writes to, or the path it deletes when the new side is `/dev/null`.
fn section_path(section: &str) -> Option<String> {
    let mut old_path = None;
    let mut git_header_path = None;

    for line in section.lines() {
        if line.starts_with("@@") {
            break;
        }
        if let Some(rest) = line.strip_prefix(NEW_FILE_PREFIX) {
            if let Some(path) = header_path(rest) {
                return Some(path);
            }
        } else if let Some(rest) = line.strip_prefix(OLD_FILE_PREFIX) {
            old_path = header_path(rest);
        } else if let Some(rest) = line.strip_prefix(FILE_HEADER_PREFIX) {
            git_header_path = rest
                .rsplit_once(" b/")
                .map(|(_, new_path)| new_path.to_string());
        }
    }

    old_path.or(git_header_path)
}

fn header_path(rest: &str) -> Option<String> {
    let path = rest.split('\t').next().unwrap_or(rest).trim_end();
    if path == DEV_NULL {
        return None;
    }
    let path = path
        .strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path);
    Some(path.to_string())
}
