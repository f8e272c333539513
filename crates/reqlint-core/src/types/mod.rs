//! Core data types for manifest handling.
//!
//! This module provides the fundamental types used throughout reqlint:
//! - Package names and their normalized form
//! - Version strings with a total ordering
//! - Requirement lines (bare, exact pin, minimum bound)
//! - Lint rule identifiers and severities

pub mod name;
pub mod requirement;
pub mod rule;
pub mod version;

// Re-export all public types
pub use name::{NameError, PackageName};
pub use requirement::{Operator, Requirement, RequirementError, RequirementErrorKind, VersionSpec};
pub use rule::{RuleId, Severity};
pub use version::{PreRelease, Version, VersionError};
