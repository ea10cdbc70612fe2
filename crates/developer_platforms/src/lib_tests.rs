//! Tests for the platform traits, driven through a recording mock.

use crate::errors::Error;
use crate::models::{Comment, PullRequest, PullRequestFile, User};
use crate::{FileContentFetcher, PullRequestProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct RecordingProvider {
    comments: Mutex<Vec<Comment>>,
    files: HashMap<String, String>,
    statuses: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl PullRequestProvider for RecordingProvider {
    async fn get_pull_request(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        pr_number: u64,
    ) -> Result<PullRequest, Error> {
        Ok(PullRequest {
            number: pr_number,
            title: "example.js.org".to_string(),
            body: None,
            author: Some(User {
                id: 1,
                login: "contributor".to_string(),
            }),
            base_ref: "master".to_string(),
        })
    }

    async fn get_pull_request_files(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
    ) -> Result<Vec<PullRequestFile>, Error> {
        Ok(vec![PullRequestFile {
            filename: "cnames_active.js".to_string(),
            additions: 1,
            deletions: 0,
            changes: 1,
            status: "modified".to_string(),
            patch: Some("@@ -1 +1,2 @@\n   ,\"a\": \"a.io\"\n+  ,\"b\": \"b.io\"".to_string()),
        }])
    }

    async fn add_comment(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
        comment: &str,
    ) -> Result<(), Error> {
        let mut comments = self.comments.lock().unwrap();
        let id = comments.len() as u64 + 1;
        comments.push(Comment {
            id,
            body: comment.to_string(),
            user: None,
        });
        Ok(())
    }

    async fn delete_comment(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        comment_id: u64,
    ) -> Result<(), Error> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != comment_id);
        if comments.len() == before {
            return Err(Error::FailedToUpdatePullRequest(format!(
                "Comment {} does not exist",
                comment_id
            )));
        }
        Ok(())
    }

    async fn list_comments(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
    ) -> Result<Vec<Comment>, Error> {
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn update_pr_check_status(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        _pr_number: u64,
        conclusion: &str,
        output_title: &str,
        _output_summary: &str,
    ) -> Result<(), Error> {
        self.statuses
            .lock()
            .unwrap()
            .push((conclusion.to_string(), output_title.to_string()));
        Ok(())
    }
}

#[async_trait]
impl FileContentFetcher for RecordingProvider {
    async fn fetch_file(
        &self,
        _repo_owner: &str,
        _repo_name: &str,
        path: &str,
        _reference: &str,
    ) -> Result<Option<String>, Error> {
        Ok(self.files.get(path).cloned())
    }
}

#[tokio::test]
async fn test_provider_usable_as_trait_object() {
    let provider: Box<dyn PullRequestProvider> = Box::new(RecordingProvider::default());

    let pr = provider.get_pull_request("js-org", "js.org", 5).await.unwrap();
    assert_eq!(pr.number, 5);
    assert_eq!(pr.author_login(), "contributor");

    let files = provider
        .get_pull_request_files("js-org", "js.org", 5)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].patch.as_deref().unwrap().contains("b.io"));
}

#[tokio::test]
async fn test_comment_lifecycle() {
    let provider = RecordingProvider::default();

    provider
        .add_comment("js-org", "js.org", 5, "first")
        .await
        .unwrap();
    provider
        .add_comment("js-org", "js.org", 5, "second")
        .await
        .unwrap();

    let comments = provider.list_comments("js-org", "js.org", 5).await.unwrap();
    assert_eq!(comments.len(), 2);

    provider.delete_comment("js-org", "js.org", 1).await.unwrap();
    let comments = provider.list_comments("js-org", "js.org", 5).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "second");

    let result = provider.delete_comment("js-org", "js.org", 1).await;
    assert!(matches!(result, Err(Error::FailedToUpdatePullRequest(_))));
}

#[tokio::test]
async fn test_check_status_is_recorded() {
    let provider = RecordingProvider::default();

    provider
        .update_pr_check_status("js-org", "js.org", 5, "failure", "2 failures", "details")
        .await
        .unwrap();

    let statuses = provider.statuses.lock().unwrap();
    assert_eq!(
        statuses.as_slice(),
        &[("failure".to_string(), "2 failures".to_string())]
    );
}

#[tokio::test]
async fn test_file_content_fetcher_missing_file() {
    let mut provider = RecordingProvider::default();
    provider.files.insert(
        "cnames_restricted.js".to_string(),
        "module.exports = [\"www\"]".to_string(),
    );

    let fetcher: &dyn FileContentFetcher = &provider;
    let found = fetcher
        .fetch_file("js-org", "js.org", "cnames_restricted.js", "master")
        .await
        .unwrap();
    assert!(found.unwrap().contains("www"));

    let missing = fetcher
        .fetch_file("js-org", "js.org", "nope.js", "master")
        .await
        .unwrap();
    assert!(missing.is_none());
}
