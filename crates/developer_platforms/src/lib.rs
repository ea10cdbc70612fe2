//! # CNAME Warden developer platforms
//!
//! Abstractions over the developer platform that hosts the registry repository.
//!
//! The validation core never talks to a platform directly. It reads the pull
//! request, the list of changed files (with their diff hunks) and the content of
//! companion data files through the traits in this crate, and reports its findings
//! back through the same traits.

use async_trait::async_trait;

pub mod errors;

pub mod github;

pub mod models;
use errors::Error;
use models::{Comment, PullRequest, PullRequestFile};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Trait to fetch file content from remote repositories.
#[async_trait]
pub trait FileContentFetcher: Sync + Send {
    /// Fetch the content of the file at `path` on the given branch or commit.
    ///
    /// Returns `Ok(Some(content))` if found, `Ok(None)` if the file does not exist, or
    /// `Err` when the platform could not be queried.
    async fn fetch_file(
        &self,
        repo_owner: &str,
        repo_name: &str,
        path: &str,
        reference: &str,
    ) -> Result<Option<String>, Error>;
}

/// Trait for interacting with developer platforms that provide pull requests (e.g., GitHub).
///
/// # Example Implementation
///
/// ```rust,no_run
/// use cname_warden_developer_platforms::{PullRequestProvider, errors::Error, models::{Comment, PullRequest, PullRequestFile}};
/// use async_trait::async_trait;
///
/// #[derive(Debug)]
/// struct MyProvider {
///     token: String,
/// }
///
/// #[async_trait]
/// impl PullRequestProvider for MyProvider {
///     async fn get_pull_request(
///         &self,
///         repo_owner: &str,
///         repo_name: &str,
///         pr_number: u64,
///     ) -> Result<PullRequest, Error> {
///         // Implementation to fetch the PR from the platform API
///         # unimplemented!()
///     }
///
///     # async fn get_pull_request_files(&self, _: &str, _: &str, _: u64) -> Result<Vec<PullRequestFile>, Error> { unimplemented!() }
///     # async fn add_comment(&self, _: &str, _: &str, _: u64, _: &str) -> Result<(), Error> { unimplemented!() }
///     # async fn delete_comment(&self, _: &str, _: &str, _: u64) -> Result<(), Error> { unimplemented!() }
///     # async fn list_comments(&self, _: &str, _: &str, _: u64) -> Result<Vec<Comment>, Error> { unimplemented!() }
///     # async fn update_pr_check_status(&self, _: &str, _: &str, _: u64, _: &str, _: &str, _: &str) -> Result<(), Error> { unimplemented!() }
/// }
/// ```
#[async_trait]
pub trait PullRequestProvider: Sync + Send {
    /// Retrieves a pull request from the platform.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    async fn get_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error>;

    /// Gets the list of files changed in a pull request, including their diff hunks.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    async fn get_pull_request_files(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error>;

    /// Adds a comment to a pull request.
    async fn add_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        comment: &str,
    ) -> Result<(), Error>;

    /// Deletes a comment from a pull request.
    async fn delete_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        comment_id: u64,
    ) -> Result<(), Error>;

    /// Lists all comments on a pull request.
    async fn list_comments(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<Comment>, Error>;

    /// Publishes the outcome of the registry checks as a check run on the head commit of
    /// the pull request.
    ///
    /// # Arguments
    ///
    /// * `repo_owner` - The owner of the repository
    /// * `repo_name` - The name of the repository
    /// * `pr_number` - The pull request number
    /// * `conclusion` - The check run conclusion (`success` or `failure`)
    /// * `output_title` - The title for the check run output
    /// * `output_summary` - The summary for the check run output. Supports Markdown
    async fn update_pr_check_status(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        conclusion: &str,
        output_title: &str,
        output_summary: &str,
    ) -> Result<(), Error>;
}
