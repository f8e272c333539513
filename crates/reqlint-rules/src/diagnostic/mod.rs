//! Lint findings and per-manifest reports

use reqlint_core::types::{RuleId, Severity};
use serde::Serialize;

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub severity: Severity,
    /// 1-based line number
    pub line: usize,
    /// 1-based column, when the finding points inside the line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

/// Findings for one manifest
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LintReport {
    /// Manifest path, when linted from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Number of valid requirements checked
    pub requirements: usize,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(rule: RuleId, severity: Severity, line: usize, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity,
            line,
            column: None,
            message: message.into(),
            help: None,
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl LintReport {
    /// Build a report, sorting diagnostics by line then rule
    pub fn new(requirements: usize, mut diagnostics: Vec<Diagnostic>) -> Self {
        diagnostics.sort_by(|a, b| (a.line, a.rule).cmp(&(b.line, b.rule)));

        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warn)
            .count();

        Self {
            path: None,
            requirements,
            errors,
            warnings,
            diagnostics,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// No errors, and no warnings either when `deny_warnings` is set
    pub fn is_clean(&self, deny_warnings: bool) -> bool {
        self.errors == 0 && (!deny_warnings || self.warnings == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_sorting_and_counts() {
        let report = LintReport::new(
            3,
            vec![
                Diagnostic::new(RuleId::Unpinned, Severity::Warn, 5, "b"),
                Diagnostic::new(RuleId::Duplicate, Severity::Error, 5, "a"),
                Diagnostic::new(RuleId::Syntax, Severity::Error, 2, "c"),
            ],
        );

        let order: Vec<_> = report.diagnostics.iter().map(|d| (d.line, d.rule)).collect();
        assert_eq!(
            order,
            vec![(2, RuleId::Syntax), (5, RuleId::Duplicate), (5, RuleId::Unpinned)]
        );
        assert_eq!(report.errors, 2);
        assert_eq!(report.warnings, 1);
        assert!(!report.is_clean(false));
    }

    #[test]
    fn test_is_clean() {
        let warn_only = LintReport::new(
            1,
            vec![Diagnostic::new(RuleId::Unpinned, Severity::Warn, 1, "x")],
        );
        assert!(warn_only.is_clean(false));
        assert!(!warn_only.is_clean(true));
        assert!(LintReport::default().is_clean(true));
    }

    #[test]
    fn test_json_shape() {
        let report = LintReport::new(
            1,
            vec![Diagnostic::new(RuleId::InvalidVersion, Severity::Error, 1, "bad")
                .with_column(6)
                .with_help("use 1.0")],
        )
        .with_path("requirements.txt");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["path"], "requirements.txt");
        assert_eq!(json["diagnostics"][0]["rule"], "invalid-version");
        assert_eq!(json["diagnostics"][0]["severity"], "error");
        assert_eq!(json["diagnostics"][0]["column"], 6);
    }
}
