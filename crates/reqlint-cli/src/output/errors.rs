//! Error and diagnostic formatting with actionable suggestions.

use std::error::Error;

use reqlint_core::error::ReqlintError;
use reqlint_core::types::Severity;
use reqlint_rules::Diagnostic;

use super::colors::ColorSupport;

/// Error formatter with suggestions
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &ReqlintError) -> String {
        let mut output = format!("{}: {}", self.colors.red("error"), error);

        if let Some(suggestion) = error.suggestion() {
            output.push_str(&format!("\n{}: {}", self.colors.dim("help"), suggestion));
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push_str(&format!("\n{}: {}", self.colors.dim("caused by"), err));
            source = err.source();
        }

        output
    }

    /// Format one lint finding as `path:line:column: severity[rule] message`
    pub fn format_diagnostic(&self, path: &str, diagnostic: &Diagnostic) -> String {
        let label = format!("{}[{}]", diagnostic.severity, diagnostic.rule);
        let label = match diagnostic.severity {
            Severity::Error => self.colors.red(&label),
            Severity::Warn => self.colors.yellow(&label),
            Severity::Allow => label,
        };

        let location = match diagnostic.column {
            Some(column) => self.format_location(path, diagnostic.line, column),
            None => format!("{}:{}", path, diagnostic.line),
        };

        let mut output = format!("{}: {} {}", self.colors.bold(&location), label, diagnostic.message);
        if let Some(help) = &diagnostic.help {
            output.push_str(&format!("\n  {}: {}", self.colors.dim("help"), help));
        }
        output
    }

    /// Format file location context
    pub fn format_location(&self, file: &str, line: usize, column: usize) -> String {
        format!("{}:{}:{}", file, line, column)
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqlint_core::types::RuleId;

    fn formatter() -> ErrorFormatter {
        ErrorFormatter::with_colors(ColorSupport::disabled())
    }

    #[test]
    fn test_format_error_with_help_and_cause() {
        let error = ReqlintError::io(
            "Failed to read requirements.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let text = formatter().format_error(&error);
        assert!(text.starts_with("error: IO error: Failed to read requirements.txt"));
        assert!(text.contains("caused by: no such file"));

        let text = formatter().format_error(&ReqlintError::FormatCheckFailed { count: 2 });
        assert!(text.contains("help: Run 'reqlint fmt'"));
    }

    #[test]
    fn test_format_diagnostic() {
        let diagnostic = Diagnostic::new(RuleId::InvalidVersion, Severity::Error, 3, "bad version")
            .with_column(8)
            .with_help("use 1.0");
        assert_eq!(
            formatter().format_diagnostic("requirements.txt", &diagnostic),
            "requirements.txt:3:8: error[invalid-version] bad version\n  help: use 1.0"
        );

        let diagnostic = Diagnostic::new(RuleId::Unpinned, Severity::Warn, 1, "no version");
        assert_eq!(
            formatter().format_diagnostic("r.txt", &diagnostic),
            "r.txt:1: warn[unpinned] no version"
        );
    }
}
