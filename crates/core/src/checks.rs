//! # Validation Checks
//!
//! The rules applied to a registry pull request, one submodule per concern:
//! - `scope`: which files the pull request touches and how many registry lines it adds
//! - `record`: the trailing comment and the parseability of the added line
//! - `format`: scheme and trailing slash in the target, canonical line shape
//! - `title`: pull request title against the entry name
//! - `redirect`: hosted targets redirect back to their subdomain
//! - `ordering`: alphabetical order and duplicates around the change
//! - `restricted`: reserved names
//!
//! Each rule returns [`crate::report::Finding`]s; the order in which they run is
//! decided by [`crate::run_checks`].

pub mod format;
pub mod ordering;
pub mod record;
pub mod redirect;
pub mod restricted;
pub mod scope;
pub mod title;
