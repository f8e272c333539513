//! Manifest handling for reqlint
//!
//! This crate reads dependency manifests without losing anything: every
//! blank line, comment and even unparseable line is kept in order, so a
//! manifest can be linted, rewritten or edited and written back faithfully.

pub mod document;
pub mod edit;
pub mod format;
pub mod parser;

// Re-export main types
pub use document::{Entry, Group, Line, Manifest};
pub use edit::EditOutcome;
pub use format::{format_manifest, is_formatted, FormatOptions};
pub use parser::{load_from_file, parse_line, parse_manifest, parse_manifest_strict, save_to_file};

use reqlint_core::error::ReqlintError;

/// Result type for manifest operations
pub type ManifestResult<T> = Result<T, ReqlintError>;
