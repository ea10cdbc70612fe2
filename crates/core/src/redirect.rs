//! # Redirect Verification
//!
//! Registry entries that point at a hosting platform (GitHub Pages by default) only
//! work once the hosted site redirects back to its registry subdomain. This module
//! asks the target for its response without following redirects and compares the
//! `Location` header with the expected subdomain URL.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[cfg(test)]
#[path = "redirect_tests.rs"]
mod tests;

/// Status code and `Location` header of a single unfollowed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub location: Option<String>,
}

/// Errors raised while probing a target.
#[derive(Error, Debug)]
pub enum RedirectError {
    #[error("Failed to create the HTTP client: {0}")]
    ClientError(String),

    #[error("Request to '{url}' failed: {message}")]
    RequestFailed { url: String, message: String },

    #[error("Request to '{url}' timed out")]
    Timeout { url: String },
}

/// Issues one request to a URL and reports how it answered.
#[async_trait]
pub trait RedirectProbe: Send + Sync {
    /// Requests `url` without following redirects.
    async fn probe(&self, url: &str) -> Result<ProbeResponse, RedirectError>;
}

/// [`RedirectProbe`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRedirectProbe {
    client: reqwest::Client,
}

impl HttpRedirectProbe {
    /// Creates a probe that never follows redirects and gives up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, RedirectError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| RedirectError::ClientError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RedirectProbe for HttpRedirectProbe {
    async fn probe(&self, url: &str) -> Result<ProbeResponse, RedirectError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RedirectError::Timeout {
                    url: url.to_string(),
                }
            } else {
                RedirectError::RequestFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Ok(ProbeResponse {
            status: response.status().as_u16(),
            location,
        })
    }
}

/// Ways a target can fail to redirect back to its registry subdomain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectFailure {
    /// The target answered 404
    TargetNotFound { target: String },

    /// The target answered without redirecting
    RedirectNotConfigured { target: String, status: u16 },

    /// The target answered with a redirect status but no `Location` header
    MissingLocation { target: String, source: String },

    /// The target redirects somewhere else
    WrongLocation {
        target: String,
        source: String,
        actual: String,
    },

    /// The target could not be reached
    Network { target: String, message: String },
}

impl RedirectFailure {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RedirectFailure::TargetNotFound { .. })
    }
}

impl fmt::Display for RedirectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedirectFailure::TargetNotFound { target } => {
                write!(f, "`{}` responds with a 404 error", target)
            }
            RedirectFailure::RedirectNotConfigured { target, status } => write!(
                f,
                "`{}` has to redirect using a CNAME file (status {})",
                target, status
            ),
            RedirectFailure::MissingLocation { target, source } => {
                write!(f, "`{}` is not redirecting to `{}`", target, source)
            }
            RedirectFailure::WrongLocation {
                target,
                source,
                actual,
            } => write!(
                f,
                "`{}` is redirecting to `{}` instead of `{}`",
                target, actual, source
            ),
            RedirectFailure::Network { target, message } => {
                write!(f, "`{}` could not be reached: {}", target, message)
            }
        }
    }
}

/// Normalizes a `Location` value for comparison: an `https` scheme becomes `http`
/// and a single trailing `/` is removed.
///
/// # Examples
///
/// ```
/// use cname_warden_core::redirect::normalize_location;
///
/// assert_eq!(normalize_location("https://example.js.org/"), "http://example.js.org");
/// assert_eq!(normalize_location("http://example.js.org"), "http://example.js.org");
/// ```
pub fn normalize_location(location: &str) -> String {
    let location = match location.strip_prefix("https") {
        Some(rest) => format!("http{}", rest),
        None => location.to_string(),
    };
    match location.strip_suffix('/') {
        Some(trimmed) => trimmed.to_string(),
        None => location,
    }
}

/// Checks that `https://<target>` redirects to `source`.
///
/// `source` is the registry URL of the entry (`http://<name>.<domain>`). There is no
/// retry; a network error is reported as [`RedirectFailure::Network`].
#[instrument(skip(probe, target), fields(redirect_target = %target))]
pub async fn verify_redirect<R>(probe: &R, source: &str, target: &str) -> Result<(), RedirectFailure>
where
    R: RedirectProbe + ?Sized,
{
    let url = format!("https://{}", target);
    let response = match probe.probe(&url).await {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "Redirect probe failed");
            return Err(RedirectFailure::Network {
                target: target.to_string(),
                message: e.to_string(),
            });
        }
    };

    debug!(
        status = response.status,
        location = ?response.location,
        "Received probe response"
    );

    if response.status == 404 {
        return Err(RedirectFailure::TargetNotFound {
            target: target.to_string(),
        });
    }

    if !(300..400).contains(&response.status) {
        return Err(RedirectFailure::RedirectNotConfigured {
            target: target.to_string(),
            status: response.status,
        });
    }

    let Some(location) = response.location.filter(|l| !l.is_empty()) else {
        return Err(RedirectFailure::MissingLocation {
            target: target.to_string(),
            source: source.to_string(),
        });
    };

    let actual = normalize_location(&location);
    if actual != source {
        return Err(RedirectFailure::WrongLocation {
            target: target.to_string(),
            source: source.to_string(),
            actual,
        });
    }

    Ok(())
}
