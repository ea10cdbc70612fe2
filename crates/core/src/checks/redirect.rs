//! # Redirect Check
//!
//! Entries pointing at a hosting platform must be backed by a redirect from the
//! hosted site to the registry subdomain (for GitHub Pages, a `CNAME` file in the
//! site repository).

use tracing::{debug, info};

use crate::context::CheckContext;
use crate::record::RegistryRecord;
use crate::redirect::{verify_redirect, RedirectProbe};
use crate::report::{Finding, Rule};

#[cfg(test)]
#[path = "redirect_tests.rs"]
mod tests;

/// Verifies the redirect of a hosted target.
///
/// Returns `None` when the target is not on a configured hosting platform or when
/// redirect checks are disabled. A 404 is reported with the `redirect_not_found`
/// severity, every other problem with the `redirect` severity.
pub async fn check_redirect<R>(
    ctx: &CheckContext,
    record: &RegistryRecord,
    probe: &R,
) -> Option<Finding>
where
    R: RedirectProbe + ?Sized,
{
    if !ctx.config.redirect_enabled {
        debug!("Redirect checks are disabled");
        return None;
    }

    if !ctx.config.is_hosted_target(&record.target) {
        debug!(redirect_target = %record.target, "Target is not on a hosting platform, skipping redirect check");
        return None;
    }

    let source = ctx.source_url(&record.name);
    info!(source = %source, redirect_target = %record.target, "Verifying redirect");

    match verify_redirect(probe, &source, &record.target).await {
        Ok(()) => Some(Finding::message(
            Rule::Redirect,
            format!(
                ":heavy_check_mark: `{}` redirects to `{}`",
                record.target, source
            ),
        )),
        Err(failure) => {
            let severity = if failure.is_not_found() {
                ctx.config.severities.redirect_not_found
            } else {
                ctx.config.severities.redirect
            };
            Some(Finding::new(Rule::Redirect, severity, failure.to_string()))
        }
    }
}
