//! # Record Extraction
//!
//! Turns one registry line into a [`RegistryRecord`].
//!
//! A registry line looks like `  ,"name": "target" // noCF`. Extraction happens in
//! two steps: the trailing line comment is split off (see [`split_line_comment`]),
//! then the remainder is read by a small tokenizer and a grammar that accepts exactly
//! one `"name": "target"` pair, optionally preceded by the comma that separates it
//! from the previous entry.

use serde::{Deserialize, Serialize};

use crate::errors::RecordParseError;

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;

/// Marker that starts a line comment.
pub const COMMENT_MARKER: &str = "//";

/// One `name -> target` entry of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistryRecord {
    /// Subdomain label
    pub name: String,

    /// Host and optional path the subdomain redirects to
    pub target: String,
}

/// A trailing `// ...` comment found on a registry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineComment {
    /// Byte offset of the comment marker in the line
    pub offset: usize,

    /// The comment text including the marker, up to the end of the line
    pub raw: String,
}

impl LineComment {
    /// The comment text after the marker, with surrounding whitespace removed.
    pub fn content(&self) -> &str {
        self.raw[COMMENT_MARKER.len()..].trim()
    }

    /// Returns `true` if the comment consists of exactly one of the allowed annotations.
    pub fn is_permitted(&self, allowed: &[String]) -> bool {
        let content = self.content();
        allowed.iter().any(|a| a == content)
    }
}

/// Splits a line into the text before its trailing comment and the comment itself.
///
/// A comment marker inside a double-quoted string (as in `"https://..."`) does not
/// start a comment. The returned body is the untouched prefix of the line, so
/// `body` followed by `comment.raw` is the original line.
///
/// # Examples
///
/// ```
/// use cname_warden_core::record::split_line_comment;
///
/// let (body, comment) = split_line_comment(r#"  ,"test": "site.io" // noCF"#);
/// assert_eq!(body, r#"  ,"test": "site.io" "#);
/// assert_eq!(comment.unwrap().content(), "noCF");
///
/// let (body, comment) = split_line_comment(r#"  ,"test": "https://site.io""#);
/// assert_eq!(body, r#"  ,"test": "https://site.io""#);
/// assert!(comment.is_none());
/// ```
pub fn split_line_comment(line: &str) -> (&str, Option<LineComment>) {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => {
                let comment = LineComment {
                    offset: i,
                    raw: line[i..].to_string(),
                };
                return (&line[..i], Some(comment));
            }
            _ => {}
        }
        i += 1;
    }

    (line, None)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Comma,
    Colon,
    Str(String),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Comma => "','".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Str(s) => format!("string \"{}\"", s),
        }
    }
}

/// A token with its 1-based character column.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Spanned {
    column: usize,
    token: Token,
}

fn column_of(fragment: &str, byte: usize) -> usize {
    fragment[..byte].chars().count() + 1
}

fn tokenize(fragment: &str) -> Result<Vec<Spanned>, RecordParseError> {
    let mut tokens = Vec::new();
    let mut chars = fragment.char_indices();

    while let Some((start, c)) = chars.next() {
        let column = column_of(fragment, start);
        match c {
            ' ' | '\t' | '\r' | '\n' => {}
            ',' => tokens.push(Spanned {
                column,
                token: Token::Comma,
            }),
            ':' => tokens.push(Spanned {
                column,
                token: Token::Colon,
            }),
            '"' => {
                let mut end = None;
                while let Some((i, c)) = chars.next() {
                    match c {
                        '\\' => {
                            chars.next();
                        }
                        '"' => {
                            end = Some(i);
                            break;
                        }
                        _ => {}
                    }
                }
                let end = end.ok_or(RecordParseError::UnterminatedString { column })?;

                // JSON string semantics, escapes included
                let literal = &fragment[start..=end];
                let value = serde_json::from_str::<String>(literal).map_err(|e| {
                    RecordParseError::InvalidString {
                        column,
                        message: e.to_string(),
                    }
                })?;
                tokens.push(Spanned {
                    column,
                    token: Token::Str(value),
                });
            }
            character => {
                return Err(RecordParseError::UnexpectedCharacter { column, character });
            }
        }
    }

    Ok(tokens)
}

fn expect_string(
    tokens: &mut std::iter::Peekable<std::vec::IntoIter<Spanned>>,
    expected: &'static str,
) -> Result<String, RecordParseError> {
    match tokens.next() {
        Some(Spanned {
            token: Token::Str(s),
            ..
        }) => Ok(s),
        Some(other) => Err(RecordParseError::UnexpectedToken {
            column: other.column,
            expected,
            found: other.token.describe(),
        }),
        None => Err(RecordParseError::UnexpectedEnd { expected }),
    }
}

/// Parses a comment-free line fragment as a single `"name": "target"` pair.
///
/// Grammar: `[","] STRING ":" STRING`. Strings follow JSON rules. Anything after the
/// pair, including a second pair, is rejected.
///
/// # Errors
///
/// Returns a [`RecordParseError`] pointing at the offending column when the fragment
/// does not have that shape, or the name is empty or holds characters outside a
/// subdomain label.
///
/// # Examples
///
/// ```
/// use cname_warden_core::record::parse_record;
///
/// let record = parse_record(r#","example": "example.github.io""#).unwrap();
/// assert_eq!(record.name, "example");
/// assert_eq!(record.target, "example.github.io");
///
/// assert!(parse_record(r#","example" "example.github.io""#).is_err());
/// ```
pub fn parse_record(fragment: &str) -> Result<RegistryRecord, RecordParseError> {
    let mut tokens = tokenize(fragment)?.into_iter().peekable();
    if tokens.peek().is_none() {
        return Err(RecordParseError::Empty);
    }

    if matches!(
        tokens.peek(),
        Some(Spanned {
            token: Token::Comma,
            ..
        })
    ) {
        tokens.next();
    }

    let name = expect_string(&mut tokens, "an entry name")?;

    match tokens.next() {
        Some(Spanned {
            token: Token::Colon,
            ..
        }) => {}
        Some(other) => {
            return Err(RecordParseError::UnexpectedToken {
                column: other.column,
                expected: "':'",
                found: other.token.describe(),
            })
        }
        None => return Err(RecordParseError::UnexpectedEnd { expected: "':'" }),
    }

    let target = expect_string(&mut tokens, "a target")?;

    if let Some(extra) = tokens.next() {
        return Err(RecordParseError::TrailingContent {
            column: extra.column,
        });
    }

    if name.is_empty() {
        return Err(RecordParseError::EmptyName);
    }

    if let Some(character) = name.chars().find(|c| !is_name_character(*c)) {
        return Err(RecordParseError::InvalidName { name, character });
    }

    Ok(RegistryRecord { name, target })
}

/// Characters allowed in an entry name: a subdomain label.
fn is_name_character(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// The pieces of an added registry line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLine {
    /// The line as it appears in the diff, marker stripped
    pub raw: String,

    /// The comment-free part of the line, trimmed
    pub fragment: String,

    pub comment: Option<LineComment>,

    pub record: Result<RegistryRecord, RecordParseError>,
}

/// Splits off the trailing comment and parses the remainder of `line`.
pub fn extract_record(line: &str) -> ExtractedLine {
    let (body, comment) = split_line_comment(line);
    let fragment = body.trim().to_string();
    let record = parse_record(&fragment);

    ExtractedLine {
        raw: line.to_string(),
        fragment,
        comment,
        record,
    }
}
