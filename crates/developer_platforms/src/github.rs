use async_trait::async_trait;
use base64::Engine;
use octocrab::Octocrab;
use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    errors::Error,
    models::{Comment, PullRequest, PullRequestFile, User},
    FileContentFetcher, PullRequestProvider,
};

/// Name of the check run that carries the registry validation result.
pub const CHECK_RUN_NAME: &str = "CNAME Warden";

/// Creates an `Octocrab` client authenticated with a personal access token.
///
/// # Errors
///
/// Returns [`Error::AuthError`] if the client cannot be built from the token.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    if token.trim().is_empty() {
        return Err(Error::AuthError("The GitHub token is empty".to_string()));
    }

    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| Error::AuthError(format!("Failed to create the GitHub client: {}", e)))
}

fn log_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let err = *source;
            error!(
                error_message = err.message,
                status_code = err.status_code.as_u16(),
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            );

            match err.status_code.as_u16() {
                401 => Error::AuthError(err.message),
                403 | 429 if err.message.to_lowercase().contains("rate limit") => {
                    Error::RateLimitExceeded
                }
                _ => Error::InvalidResponse,
            }
        }
        octocrab::Error::UriParse { source, backtrace } => {
            error!(
                error_message = source.to_string(),
                backtrace = backtrace.to_string(),
                "{}. Failed to parse URI.",
                message
            );
            Error::ApiError()
        }
        octocrab::Error::InvalidUtf8 { source, backtrace } => {
            error!(
                error_message = source.to_string(),
                backtrace = backtrace.to_string(),
                "{}. The message wasn't valid UTF-8.",
                message,
            );
            Error::InvalidResponse
        }
        _ => {
            error!(error_message = e.to_string(), message);
            Error::ApiError()
        }
    }
}

fn saturating_count(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// GitHub implementation of the platform traits, backed by `octocrab`.
#[derive(Debug, Default)]
pub struct GitHubProvider {
    client: Octocrab,
}

impl GitHubProvider {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FileContentFetcher for GitHubProvider {
    #[instrument]
    async fn fetch_file(
        &self,
        repo_owner: &str,
        repo_name: &str,
        path: &str,
        reference: &str,
    ) -> Result<Option<String>, Error> {
        let content_result = self
            .client
            .repos(repo_owner, repo_name)
            .get_content()
            .path(path)
            .r#ref(reference)
            .send()
            .await;

        match content_result {
            Ok(response) => {
                let Some(file) = response.items.into_iter().next() else {
                    return Ok(None);
                };
                let Some(content) = file.content else {
                    return Ok(None);
                };

                // GitHub API returns base64 encoded content with newlines
                let decoded = base64::engine::general_purpose::STANDARD
                    .decode(content.replace('\n', ""))
                    .map_err(|_| Error::InvalidResponse)?;
                let content_str = String::from_utf8(decoded).map_err(|_| Error::InvalidResponse)?;

                debug!(
                    repository_owner = repo_owner,
                    repository = repo_name,
                    path,
                    reference,
                    bytes = content_str.len(),
                    "Fetched file content"
                );
                Ok(Some(content_str))
            }
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code.as_u16() == 404 => {
                warn!(
                    repository_owner = repo_owner,
                    repository = repo_name,
                    path,
                    reference,
                    "File does not exist"
                );
                Ok(None)
            }
            Err(e) => Err(log_octocrab_error("Failed to fetch file content", e)),
        }
    }
}

#[async_trait]
impl PullRequestProvider for GitHubProvider {
    #[instrument]
    async fn get_pull_request(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error> {
        let pr = self
            .client
            .pulls(repo_owner, repo_name)
            .get(pr_number)
            .await
            .map_err(|e| log_octocrab_error("Failed to get pull request information", e))?;

        Ok(PullRequest {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            body: pr.body,
            author: pr.user.map(|u| User {
                id: u.id.into_inner(),
                login: u.login,
            }),
            base_ref: pr.base.ref_field,
        })
    }

    #[instrument]
    async fn get_pull_request_files(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error> {
        let mut current_page = self
            .client
            .pulls(repo_owner, repo_name)
            .list_files(pr_number)
            .await
            .map_err(|e| log_octocrab_error("Failed to list files for pull request", e))?;

        let mut entries = current_page.take_items();
        while let Ok(Some(mut new_page)) = self.client.get_page(&current_page.next).await {
            entries.extend(new_page.take_items());

            current_page = new_page;
        }

        let files: Vec<PullRequestFile> = entries
            .into_iter()
            .map(|entry| {
                let status = serde_json::to_value(&entry.status)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_else(|| "modified".to_string());

                PullRequestFile {
                    filename: entry.filename,
                    additions: saturating_count(entry.additions),
                    deletions: saturating_count(entry.deletions),
                    changes: saturating_count(entry.changes),
                    status,
                    patch: entry.patch,
                }
            })
            .collect();

        info!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            count = files.len(),
            "Listed changed files"
        );

        Ok(files)
    }

    #[instrument]
    async fn add_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        comment: &str,
    ) -> Result<(), Error> {
        match self
            .client
            .issues(repo_owner, repo_name)
            .create_comment(pr_number, comment)
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                log_octocrab_error("Failed to add pull request comment", e);
                Err(Error::FailedToUpdatePullRequest(
                    "Failed to add comment".to_string(),
                ))
            }
        }
    }

    #[instrument]
    async fn delete_comment(
        &self,
        repo_owner: &str,
        repo_name: &str,
        comment_id: u64,
    ) -> Result<(), Error> {
        self.client
            .issues(repo_owner, repo_name)
            .delete_comment(comment_id.into())
            .await
            .map_err(|e| {
                warn!(
                    repository_owner = repo_owner,
                    repository = repo_name,
                    comment = comment_id,
                    "Failed to delete pr comment",
                );
                Error::FailedToUpdatePullRequest(format!("Failed to delete comment: {}", e))
            })
    }

    #[instrument]
    async fn list_comments(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
    ) -> Result<Vec<Comment>, Error> {
        let mut current_page = self
            .client
            .issues(repo_owner, repo_name)
            .list_comments(pr_number)
            .send()
            .await
            .map_err(|e| log_octocrab_error("Failed to list comments for pull request", e))?;

        let mut comments = current_page.take_items();
        while let Ok(Some(mut new_page)) = self.client.get_page(&current_page.next).await {
            comments.extend(new_page.take_items());

            current_page = new_page;
        }

        let result = comments
            .into_iter()
            .map(|c| Comment {
                id: c.id.0,
                body: c.body.unwrap_or_default(),
                user: Some(User {
                    id: c.user.id.into_inner(),
                    login: c.user.login,
                }),
            })
            .collect();

        Ok(result)
    }

    #[instrument(skip(output_summary))]
    async fn update_pr_check_status(
        &self,
        repo_owner: &str,
        repo_name: &str,
        pr_number: u64,
        conclusion: &str,
        output_title: &str,
        output_summary: &str,
    ) -> Result<(), Error> {
        // The check run is attached to the head commit of the PR
        let pr_data = self
            .client
            .pulls(repo_owner, repo_name)
            .get(pr_number)
            .await
            .map_err(|e| log_octocrab_error("Failed to get PR for check run", e))?;
        let head_sha = pr_data.head.sha;

        let url = format!("/repos/{}/{}/check-runs", repo_owner, repo_name);
        let payload = json!({
            "name": CHECK_RUN_NAME,
            "head_sha": head_sha,
            "status": "completed",
            "conclusion": conclusion,
            "output": {
                "title": output_title,
                "summary": output_summary
            }
        });

        let _: serde_json::Value = self.client.post(url, Some(&payload)).await.map_err(|e| {
            log_octocrab_error("Failed to create check run", e);
            Error::FailedToUpdatePullRequest("Failed to create check run".to_string())
        })?;

        info!(
            repository_owner = repo_owner,
            repository = repo_name,
            pull_request = pr_number,
            conclusion,
            "Published check run"
        );
        Ok(())
    }
}
