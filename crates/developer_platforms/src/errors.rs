#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Error types for developer platform operations.
///
/// This enum represents the failures that can occur when reading pull request
/// information from, or reporting check results to, a developer platform.
///
/// # Examples
///
/// ```rust
/// use cname_warden_developer_platforms::errors::Error;
///
/// let auth_error = Error::AuthError("Invalid token".to_string());
/// assert_eq!(auth_error.to_string(), "Authentication failed: Invalid token");
///
/// let rate_limit = Error::RateLimitExceeded;
/// assert_eq!(rate_limit.to_string(), "Rate limit exceeded");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic API request failure.
    ///
    /// Used as a fallback when the platform did not give more specific
    /// information about the failure.
    #[error("API request failed")]
    ApiError(),

    /// Authentication failed with the platform.
    ///
    /// The provided token is invalid, expired or lacks the permissions needed to
    /// read the pull request or to post comments on it.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Failed to update pull request.
    ///
    /// Posting or deleting a comment, or publishing the check status, failed.
    /// The string parameter describes which operation failed.
    #[error("Failed to update the PR: {0}")]
    FailedToUpdatePullRequest(String),

    /// Invalid response format from platform API.
    ///
    /// The response did not have the expected shape, or file content could not be
    /// decoded.
    #[error("Invalid response format")]
    InvalidResponse,

    /// Platform rate limit exceeded.
    ///
    /// The check should be re-run once the rate limit window resets.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
