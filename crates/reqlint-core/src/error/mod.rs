//! Error types and result aliases for reqlint operations.
//!
//! Provides a unified error type that covers all possible error conditions
//! across the reqlint crates with actionable error messages.

use thiserror::Error;

/// Unified error type for all reqlint operations
#[derive(Error, Debug)]
pub enum ReqlintError {
    // Manifest errors
    #[error("Failed to parse manifest: {message} at line {line}, column {column}")]
    ManifestParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid package name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Unsupported operator '{operator}' in '{requirement}'")]
    UnsupportedOperator {
        operator: String,
        requirement: String,
    },

    #[error("Package '{name}' not found in manifest")]
    PackageNotFound { name: String },

    // Config errors
    #[error("Failed to parse reqlint.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Usage errors
    #[error("Unknown command '{name}'{hint}")]
    UnknownCommand { name: String, hint: String },

    // Lint errors
    #[error("Lint failed with {errors} error(s) and {warnings} warning(s)")]
    LintFailed { errors: usize, warnings: usize },

    #[error("{count} file(s) would be reformatted")]
    FormatCheckFailed { count: usize },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for reqlint operations
pub type ReqlintResult<T> = Result<T, ReqlintError>;

impl ReqlintError {
    /// Create an IO error from std::io::Error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a config validation error
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error
    ///
    /// Findings exit with 1, bad input or configuration with 2, and IO
    /// failures with 74 (EX_IOERR).
    pub fn exit_code(&self) -> u8 {
        match self {
            ReqlintError::LintFailed { .. } | ReqlintError::FormatCheckFailed { .. } => 1,
            ReqlintError::Io { .. } => 74,
            _ => 2,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ReqlintError::ManifestParse { .. } => {
                Some("Each line must be blank, a '#' comment, 'name', 'name==version' or 'name>=version'")
            },
            ReqlintError::InvalidName { .. } => Some(
                "Package names use letters, digits, '-', '_' and '.', and start and end with a letter or digit",
            ),
            ReqlintError::InvalidVersion { .. } => {
                Some("Use a version like '1.2.3', '2.0rc1', '1.0.post2' or '1!2.0'")
            },
            ReqlintError::UnsupportedOperator { .. } => {
                Some("Pin with '==' or set a lower bound with '>='")
            },
            ReqlintError::PackageNotFound { .. } => {
                Some("Run 'reqlint list' to see the packages in the manifest")
            },
            ReqlintError::TomlParse { .. } | ReqlintError::ConfigValidation { .. } => {
                Some("Run 'reqlint init' in an empty directory to see a valid reqlint.toml")
            },
            ReqlintError::UnknownCommand { .. } => Some("Run 'reqlint --help' to see available commands"),
            ReqlintError::LintFailed { .. } => {
                Some("Fix the reported lines or relax rules with --warn/--allow")
            },
            ReqlintError::FormatCheckFailed { .. } => Some("Run 'reqlint fmt' to rewrite the files"),
            ReqlintError::Io { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            ReqlintError::LintFailed {
                errors: 1,
                warnings: 0
            }
            .exit_code(),
            1
        );
        assert_eq!(ReqlintError::FormatCheckFailed { count: 2 }.exit_code(), 1);
        assert_eq!(ReqlintError::config("rules", "bad").exit_code(), 2);

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(ReqlintError::io("read failed", io).exit_code(), 74);
    }

    #[test]
    fn test_error_display_and_suggestion() {
        let err = ReqlintError::ManifestParse {
            message: "expected a version".to_string(),
            line: 3,
            column: 7,
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse manifest: expected a version at line 3, column 7"
        );
        assert_eq!(err.exit_code(), 2);
        assert!(err.suggestion().is_some());

        let err = ReqlintError::PackageNotFound {
            name: "pandas".to_string(),
        };
        assert_eq!(err.to_string(), "Package 'pandas' not found in manifest");
    }
}
