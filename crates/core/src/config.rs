//! Configuration settings for the CNAME Warden core functionality.
//!
//! This module centralizes the constants, patterns and rule severities used by the
//! checks. A [`WardenConfig`] is what lives in the TOML file; it is resolved into a
//! [`ValidationConfig`] with compiled patterns and concrete severities before a run.
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::errors::ConfigLoadError;
use crate::report::Severity;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Registry file holding the `"name": "target"` entries
pub const DEFAULT_ACTIVE_FILE: &str = "cnames_active.js";

/// Companion file listing reserved names
pub const DEFAULT_RESTRICTED_FILE: &str = "cnames_restricted.js";

/// Domain the registry hands out subdomains of
pub const DEFAULT_DOMAIN: &str = "js.org";

/// The only annotation a registry line may carry in its trailing comment
pub const DEFAULT_ANNOTATION: &str = "noCF";

/// Targets matching this pattern are checked for a redirect back to the registry domain
pub const DEFAULT_HOSTING_PATTERN: &str = r"\.github\.io";

/// Timeout applied to the redirect probe
pub const DEFAULT_REDIRECT_TIMEOUT_SECONDS: u64 = 10;

/// HTML comment marker for the summary comment posted on the pull request
pub const SUMMARY_COMMENT_MARKER: &str = "<!-- CNAME_WARDEN_SUMMARY -->";

/// Configuration schema version understood by this build
pub const SCHEMA_VERSION: u32 = 1;

lazy_static! {
    /// Canonical shape of an added registry line (diff marker already stripped)
    pub static ref CANONICAL_SHAPE_REGEX: Regex = Regex::new(
        r#"^ {2},"[\da-z]+?":\s"\S+?"$"#
    ).expect("Failed to compile canonical shape regex");

    /// Entry name at the start of a registry line, used for the ordering check
    pub static ref ENTRY_NAME_REGEX: Regex = Regex::new(
        r#""(.+?)"\s*?:"#
    ).expect("Failed to compile entry name regex");

    /// Scheme prefix that must not appear in a target
    pub static ref SCHEME_REGEX: Regex = Regex::new(
        r"(?i)https?://"
    ).expect("Failed to compile scheme regex");
}

/// Builds the pattern a pull request title must match: `<name>.<domain>`.
///
/// The first capture group holds `<name>`.
pub fn title_regex(domain: &str) -> Result<Regex, ConfigLoadError> {
    let pattern = format!(r"^([\d\w]+?)\.{}$", regex::escape(domain));
    Regex::new(&pattern).map_err(|source| ConfigLoadError::InvalidPattern { pattern, source })
}

/// Location of the registry data and the properties of the registry domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Path of the registry file relative to the repository root
    #[serde(default = "RegistryConfig::default_active_file")]
    pub active_file: String,

    /// Path of the restricted-name file relative to the repository root
    #[serde(default = "RegistryConfig::default_restricted_file")]
    pub restricted_file: String,

    /// Domain the registry hands out subdomains of
    #[serde(default = "RegistryConfig::default_domain")]
    pub domain: String,

    /// Regex patterns identifying hosting platforms whose targets get a redirect check
    #[serde(default = "RegistryConfig::default_hosting_patterns")]
    pub hosting_patterns: Vec<String>,

    /// Annotations allowed in a trailing line comment
    #[serde(default = "RegistryConfig::default_allowed_annotations")]
    pub allowed_annotations: Vec<String>,
}

impl RegistryConfig {
    fn default_active_file() -> String {
        DEFAULT_ACTIVE_FILE.to_string()
    }

    fn default_restricted_file() -> String {
        DEFAULT_RESTRICTED_FILE.to_string()
    }

    fn default_domain() -> String {
        DEFAULT_DOMAIN.to_string()
    }

    fn default_hosting_patterns() -> Vec<String> {
        vec![DEFAULT_HOSTING_PATTERN.to_string()]
    }

    fn default_allowed_annotations() -> Vec<String> {
        vec![DEFAULT_ANNOTATION.to_string()]
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            active_file: Self::default_active_file(),
            restricted_file: Self::default_restricted_file(),
            domain: Self::default_domain(),
            hosting_patterns: Self::default_hosting_patterns(),
            allowed_annotations: Self::default_allowed_annotations(),
        }
    }
}

/// Named severity presets.
///
/// `lenient` reports scope and redirect problems as warnings; `strict` blocks on them
/// and stops at the first failure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RulePreset {
    #[default]
    Lenient,
    Strict,
}

/// Severity used by each configurable rule.
///
/// Rules that are not listed here (unparseable entry, disallowed comment, bad target
/// formatting, ordering, duplicates, restricted names, registry file untouched, more
/// than one added line) always block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSeverities {
    /// Files other than the registry file were modified or created
    pub scope: Severity,
    /// The registry diff adds no line
    pub no_additions: Severity,
    /// The added line carries a (permitted) trailing comment
    pub comment_present: Severity,
    /// The added line deviates from the canonical shape
    pub exact_shape: Severity,
    /// The pull request title is not `<name>.<domain>`
    pub title_format: Severity,
    /// The title names a different entry than the one added
    pub title_mismatch: Severity,
    /// The hosted target does not redirect correctly
    pub redirect: Severity,
    /// The hosted target responds with 404
    pub redirect_not_found: Severity,
}

impl RuleSeverities {
    pub fn lenient() -> Self {
        Self {
            scope: Severity::Warning,
            no_additions: Severity::Warning,
            comment_present: Severity::Warning,
            exact_shape: Severity::Warning,
            title_format: Severity::Warning,
            title_mismatch: Severity::Warning,
            redirect: Severity::Warning,
            redirect_not_found: Severity::Failure,
        }
    }

    pub fn strict() -> Self {
        Self {
            scope: Severity::Failure,
            no_additions: Severity::Message,
            comment_present: Severity::Warning,
            exact_shape: Severity::Warning,
            title_format: Severity::Warning,
            title_mismatch: Severity::Warning,
            redirect: Severity::Failure,
            redirect_not_found: Severity::Failure,
        }
    }

    pub fn for_preset(preset: RulePreset) -> Self {
        match preset {
            RulePreset::Lenient => Self::lenient(),
            RulePreset::Strict => Self::strict(),
        }
    }
}

impl Default for RuleSeverities {
    fn default() -> Self {
        Self::lenient()
    }
}

/// Rule configuration as written in the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RulesConfig {
    #[serde(default)]
    pub preset: RulePreset,

    /// Stop evaluating after the first blocking finding. Defaults to the preset's behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_on_failure: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_additions: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_present: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_shape: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_format: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_mismatch: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_not_found: Option<Severity>,
}

impl RulesConfig {
    /// Applies the per-rule overrides on top of the preset.
    pub fn severities(&self) -> RuleSeverities {
        let preset = RuleSeverities::for_preset(self.preset);
        RuleSeverities {
            scope: self.scope.unwrap_or(preset.scope),
            no_additions: self.no_additions.unwrap_or(preset.no_additions),
            comment_present: self.comment_present.unwrap_or(preset.comment_present),
            exact_shape: self.exact_shape.unwrap_or(preset.exact_shape),
            title_format: self.title_format.unwrap_or(preset.title_format),
            title_mismatch: self.title_mismatch.unwrap_or(preset.title_mismatch),
            redirect: self.redirect.unwrap_or(preset.redirect),
            redirect_not_found: self.redirect_not_found.unwrap_or(preset.redirect_not_found),
        }
    }

    pub fn stop_on_failure(&self) -> bool {
        self.stop_on_failure
            .unwrap_or(self.preset == RulePreset::Strict)
    }
}

/// Settings for the redirect probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedirectConfig {
    /// Whether hosted targets are probed at all
    #[serde(default = "RedirectConfig::default_enabled")]
    pub enabled: bool,

    /// Request timeout in seconds
    #[serde(default = "RedirectConfig::default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl RedirectConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_timeout_seconds() -> u64 {
        DEFAULT_REDIRECT_TIMEOUT_SECONDS
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            timeout_seconds: Self::default_timeout_seconds(),
        }
    }
}

/// Top-level configuration file for cname-warden
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WardenConfig {
    #[serde(rename = "schemaVersion")]
    pub schema_version: u32,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub redirect: RedirectConfig,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            registry: RegistryConfig::default(),
            rules: RulesConfig::default(),
            redirect: RedirectConfig::default(),
        }
    }
}

impl WardenConfig {
    /// Convert the file configuration into the runtime configuration used by the checks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigLoadError::InvalidPattern`] if a hosting pattern is not a valid regex.
    pub fn to_validation_config(&self) -> Result<ValidationConfig, ConfigLoadError> {
        let hosting_patterns = self
            .registry
            .hosting_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigLoadError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidationConfig {
            title_regex: title_regex(&self.registry.domain)?,
            registry: self.registry.clone(),
            severities: self.rules.severities(),
            stop_on_failure: self.rules.stop_on_failure(),
            hosting_patterns,
            redirect_enabled: self.redirect.enabled,
            redirect_timeout: Duration::from_secs(self.redirect.timeout_seconds),
        })
    }
}

/// Runtime configuration for a validation run
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub registry: RegistryConfig,

    pub severities: RuleSeverities,

    /// Stop evaluating after the first blocking finding
    pub stop_on_failure: bool,

    /// Compiled `RegistryConfig::hosting_patterns`
    pub hosting_patterns: Vec<Regex>,

    /// `^(<name>)\.<domain>$` for the configured domain
    pub title_regex: Regex,

    pub redirect_enabled: bool,

    pub redirect_timeout: Duration,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            severities: RuleSeverities::default(),
            stop_on_failure: false,
            hosting_patterns: vec![Regex::new(DEFAULT_HOSTING_PATTERN)
                .expect("Failed to compile default hosting pattern")],
            title_regex: title_regex(DEFAULT_DOMAIN)
                .expect("Failed to compile default title pattern"),
            redirect_enabled: true,
            redirect_timeout: Duration::from_secs(DEFAULT_REDIRECT_TIMEOUT_SECONDS),
        }
    }
}

impl ValidationConfig {
    /// Returns `true` if the target is served by one of the configured hosting platforms.
    pub fn is_hosted_target(&self, target: &str) -> bool {
        self.hosting_patterns.iter().any(|p| p.is_match(target))
    }
}

/// Loads the cname-warden configuration from the given path.
///
/// # Arguments
/// * `path` - Path to the configuration file
///
/// # Returns
/// * `Ok(WardenConfig)` if loaded and valid
/// * `Err(ConfigLoadError)` if the file is missing, malformed or has an unsupported
///   schema version
pub fn load_warden_config<P: AsRef<Path>>(path: P) -> Result<WardenConfig, ConfigLoadError> {
    let path_ref = path.as_ref();
    let content = match fs::read_to_string(path_ref) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigLoadError::NotFound(path_ref.display().to_string()));
        }
        Err(e) => return Err(ConfigLoadError::Io(e)),
    };
    parse_warden_config(&content)
}

/// Parses cname-warden configuration from TOML text.
pub fn parse_warden_config(content: &str) -> Result<WardenConfig, ConfigLoadError> {
    let config: WardenConfig = toml::from_str(content)?;
    if config.schema_version != SCHEMA_VERSION {
        return Err(ConfigLoadError::UnsupportedSchemaVersion(
            config.schema_version,
        ));
    }
    Ok(config)
}
