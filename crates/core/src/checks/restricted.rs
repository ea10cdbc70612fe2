//! Reserved-name check.

use crate::context::CheckContext;
use crate::record::RegistryRecord;
use crate::report::{Finding, Rule};

#[cfg(test)]
#[path = "restricted_tests.rs"]
mod tests;

/// Blocks an entry whose name is in the restricted-name set.
pub fn check_restricted_name(ctx: &CheckContext, record: &RegistryRecord) -> Option<Finding> {
    if !ctx.restricted.contains(&record.name) {
        return None;
    }

    Some(Finding::failure(
        Rule::RestrictedName,
        format!(
            "You are using a restricted name `{}`. Refer {} for more info.",
            record.name, ctx.config.registry.restricted_file
        ),
    ))
}
