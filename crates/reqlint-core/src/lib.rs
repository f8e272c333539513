//! # reqlint-core
//!
//! Core types and utilities shared across all reqlint crates.
//!
//! This crate provides:
//! - `PackageName` with normalized comparison
//! - `Version` parsing and ordering for manifest version strings
//! - `Requirement` and `VersionSpec` for the three requirement forms
//! - `RuleId` and `Severity` shared by the config and rules crates
//! - `ReqlintError` enum for unified error handling
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (PackageName, Version, Requirement)
//! - `error`: Error types and result aliases

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ReqlintError, ReqlintResult};
pub use types::{PackageName, Requirement, RuleId, Severity, Version, VersionSpec};
