//! # Models
//!
//! This module contains the data models exchanged with developer platforms.
//!
//! These models represent the entities that CNAME Warden reads from a platform
//! (pull requests and the files they change) and the entities it writes back
//! (comments). They are serializable so that they can be captured in test fixtures.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;

/// File status reported by the platform for a file that was created by the pull request.
pub const FILE_STATUS_ADDED: &str = "added";

/// File status reported by the platform for a file that was deleted by the pull request.
pub const FILE_STATUS_REMOVED: &str = "removed";

/// Represents a comment on a pull request.
///
/// # Examples
///
/// ```
/// use cname_warden_developer_platforms::models::Comment;
///
/// let comment = Comment {
///     id: 456,
///     body: "Only one line added!".to_string(),
///     user: None,
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// The unique identifier of the comment
    pub id: u64,

    /// The text content of the comment
    pub body: String,

    /// The account that wrote the comment, if known
    #[serde(default)]
    pub user: Option<User>,
}

/// Represents a pull request from a developer platform.
///
/// # Examples
///
/// ```
/// use cname_warden_developer_platforms::models::{PullRequest, User};
///
/// let pr = PullRequest {
///     number: 123,
///     title: "example.js.org".to_string(),
///     body: None,
///     author: Some(User { id: 1, login: "octocat".to_string() }),
///     base_ref: "master".to_string(),
/// };
/// assert_eq!(pr.author_login(), "octocat");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// The pull request number
    pub number: u64,

    /// The title of the pull request
    pub title: String,

    /// The description/body of the pull request, if any
    pub body: Option<String>,

    /// The account that opened the pull request
    #[serde(default)]
    pub author: Option<User>,

    /// The branch the pull request will be merged into
    #[serde(default = "PullRequest::default_base_ref")]
    pub base_ref: String,
}

impl PullRequest {
    fn default_base_ref() -> String {
        "master".to_string()
    }

    /// Returns the login of the author, or an empty string when the platform did not report one.
    pub fn author_login(&self) -> &str {
        self.author.as_ref().map(|u| u.login.as_str()).unwrap_or("")
    }
}

/// A single file changed by a pull request.
///
/// `patch` holds the unified diff hunks for the file as the platform reports them. Large
/// or binary files may be reported without a patch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequestFile {
    /// Path of the file relative to the repository root
    pub filename: String,

    /// Number of added lines
    pub additions: u32,

    /// Number of removed lines
    pub deletions: u32,

    /// Total number of changed lines
    pub changes: u32,

    /// Change status, e.g. `added`, `modified`, `removed`, `renamed`
    pub status: String,

    /// Unified diff hunks for the file
    #[serde(default)]
    pub patch: Option<String>,
}

impl PullRequestFile {
    /// Returns `true` if the pull request creates this file.
    pub fn is_added(&self) -> bool {
        self.status == FILE_STATUS_ADDED
    }

    /// Returns `true` if the pull request deletes this file.
    pub fn is_removed(&self) -> bool {
        self.status == FILE_STATUS_REMOVED
    }
}

/// An account on the developer platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// The unique identifier of the account
    pub id: u64,

    /// The login handle of the account
    pub login: String,
}
