use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that stop the validation pipeline.
///
/// Validation outcomes (a malformed record, an out-of-order entry, ...) are reported
/// as findings in a [`crate::report::Report`]. These errors are reserved for the
/// situations where the checks cannot run at all.
#[derive(Error, Debug)]
pub enum WardenError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to update pull request. Issue was: '{0}'.")]
    FailedToUpdatePullRequest(String),

    #[error("Git provider error: {0}")]
    GitProviderError(String),

    #[error("Invalid restricted name list: {0}")]
    RestrictedNames(#[from] RestrictedNamesError),

    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unsupported configuration schema version: {0}")]
    UnsupportedSchemaVersion(u32),

    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Reasons a registry line fragment could not be read as a single `"name": "target"` pair.
///
/// Columns are 1-based character positions within the comment-stripped fragment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordParseError {
    #[error("the line is empty")]
    Empty,

    #[error("unexpected character '{character}' at column {column}")]
    UnexpectedCharacter { column: usize, character: char },

    #[error("unterminated string starting at column {column}")]
    UnterminatedString { column: usize },

    #[error("invalid string at column {column}: {message}")]
    InvalidString { column: usize, message: String },

    #[error("expected {expected} at column {column}, found {found}")]
    UnexpectedToken {
        column: usize,
        expected: &'static str,
        found: String,
    },

    #[error("expected {expected} but the line ended")]
    UnexpectedEnd { expected: &'static str },

    #[error("unexpected content after the entry at column {column}")]
    TrailingContent { column: usize },

    #[error("the entry name is empty")]
    EmptyName,

    #[error("the entry name '{name}' contains '{character}'; only letters, digits, '_' and '-' are allowed")]
    InvalidName { name: String, character: char },
}

/// Reasons the restricted-name list could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestrictedNamesError {
    #[error("entry '{entry}' has an unbalanced suffix group")]
    UnbalancedSuffixGroup { entry: String },

    #[error("entry '{entry}' has content after its suffix group")]
    TrailingContent { entry: String },

    #[error("entry '{entry}' has an invalid suffix '{suffix}'")]
    InvalidSuffix { entry: String, suffix: String },

    #[error("entry '{entry}' has an empty base name")]
    EmptyBase { entry: String },
}
