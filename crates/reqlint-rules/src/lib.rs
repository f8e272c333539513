//! Lint rules for dependency manifests
//!
//! This crate checks parsed manifests for syntax problems, malformed
//! versions, duplicate and conflicting entries, and style issues, and
//! lints many manifests in parallel.

pub mod checks;
pub mod constraints;
pub mod diagnostic;
pub mod files;

// Re-export main types
pub use checks::lint;
pub use constraints::{Conflict, ConstraintSet};
pub use diagnostic::{Diagnostic, LintReport};
pub use files::{discover_manifests, is_manifest_name, lint_file, lint_files, lint_source};

use reqlint_core::error::ReqlintError;

/// Result type for rule operations
pub type RulesResult<T> = Result<T, ReqlintError>;
