//! Resolved settings used by the linter and formatter

use std::collections::BTreeMap;

use reqlint_core::types::{RuleId, Severity};
use reqlint_manifest::FormatOptions;

/// Default manifest file checked when nothing else is configured
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Severity for every rule, falling back to the rule's default
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSettings {
    overrides: BTreeMap<RuleId, Severity>,
}

/// Fully layered configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintConfig {
    pub rules: RuleSettings,
    pub format: FormatOptions,
    /// Treat warnings as failures
    pub deny_warnings: bool,
    /// Manifests checked when no paths are given
    pub manifest_files: Vec<String>,
}

impl RuleSettings {
    /// Settings with every rule at its default severity
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective severity for a rule
    pub fn severity(&self, rule: RuleId) -> Severity {
        self.overrides
            .get(&rule)
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }

    /// Override a rule's severity
    pub fn set(&mut self, rule: RuleId, severity: Severity) {
        self.overrides.insert(rule, severity);
    }

    /// Builder form of `set`
    pub fn with(mut self, rule: RuleId, severity: Severity) -> Self {
        self.set(rule, severity);
        self
    }

    /// Check if a rule reports anything
    pub fn is_enabled(&self, rule: RuleId) -> bool {
        self.severity(rule) != Severity::Allow
    }
}

impl LintConfig {
    /// Manifest paths to use when the command line names none
    pub fn default_manifests(&self) -> Vec<String> {
        if self.manifest_files.is_empty() {
            vec![DEFAULT_MANIFEST.to_string()]
        } else {
            self.manifest_files.clone()
        }
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            rules: RuleSettings::default(),
            format: FormatOptions::default(),
            deny_warnings: false,
            manifest_files: Vec::new(),
        }
    }
}
