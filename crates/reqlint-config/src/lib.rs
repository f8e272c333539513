//! Configuration loading for reqlint
//!
//! This crate handles parsing and validation of reqlint.toml files and
//! layers defaults, the global config, the project config, environment
//! variables and command-line flags into one `LintConfig`.

pub mod merge;
pub mod settings;
pub mod toml;

// Re-export main types
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource, LoadedConfig};
pub use settings::{LintConfig, RuleSettings};
pub use toml::{default_config_toml, parse_reqlint_toml, ReqlintToml};

use reqlint_core::error::ReqlintError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ReqlintError>;

/// Project configuration file name
pub const CONFIG_FILE_NAME: &str = "reqlint.toml";
