//! Inputs of a validation run.
//!
//! Everything the rules look at is collected into one [`CheckContext`] before the
//! run starts and handed to each rule by reference.

use crate::config::ValidationConfig;
use crate::diff::FileDiff;
use crate::restricted::RestrictedNames;

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;

/// The pull request facts the rules need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestContext {
    pub title: String,

    /// Login of the pull request author
    pub author: String,

    /// Paths of existing files the pull request changes
    pub modified_files: Vec<String>,

    /// Paths of files the pull request adds
    pub created_files: Vec<String>,
}

impl PullRequestContext {
    /// Modified and created paths, each path once, in first-seen order.
    pub fn touched_files(&self) -> Vec<&str> {
        let mut touched: Vec<&str> = Vec::new();
        for path in self.modified_files.iter().chain(&self.created_files) {
            if !touched.contains(&path.as_str()) {
                touched.push(path);
            }
        }
        touched
    }
}

/// Everything a validation run reads.
#[derive(Debug, Clone)]
pub struct CheckContext {
    pub pull_request: PullRequestContext,

    /// Diff of the registry file
    pub diff: FileDiff,

    pub restricted: RestrictedNames,

    pub config: ValidationConfig,
}

impl CheckContext {
    pub fn new(
        pull_request: PullRequestContext,
        diff: FileDiff,
        restricted: RestrictedNames,
        config: ValidationConfig,
    ) -> Self {
        Self {
            pull_request,
            diff,
            restricted,
            config,
        }
    }

    /// The registry URL of an entry: `http://<name>.<domain>`.
    pub fn source_url(&self, name: &str) -> String {
        format!("http://{}.{}", name, self.config.registry.domain)
    }
}
