//! `reqlint check` command implementation.
//!
//! Lints every target manifest in parallel and prints the findings as text
//! or JSON.

use clap::{Args, ValueEnum};
use reqlint_core::error::{ReqlintError, ReqlintResult};
use reqlint_rules::{lint_files, LintReport};
use tracing::debug;

use super::CommandContext;
use crate::output::errors::ErrorFormatter;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Args)]
pub struct CheckArgs {
    /// Manifest files or directories to check
    pub paths: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Fail when there are warnings
    #[arg(long)]
    pub deny_warnings: bool,

    /// Report a rule as an error
    #[arg(long, value_name = "RULE")]
    pub deny: Vec<String>,

    /// Report a rule as a warning
    #[arg(long, value_name = "RULE")]
    pub warn: Vec<String>,

    /// Turn a rule off
    #[arg(long, value_name = "RULE")]
    pub allow: Vec<String>,
}

impl CheckArgs {
    /// Flags as dotted config overrides, weakest first so `--deny` wins
    pub fn overrides(&self) -> Vec<(String, String)> {
        let mut overrides = Vec::new();

        for (rules, severity) in [(&self.allow, "allow"), (&self.warn, "warn"), (&self.deny, "error")] {
            for rule in rules {
                overrides.push((format!("rule.{}", rule), severity.to_string()));
            }
        }

        if self.deny_warnings {
            overrides.push(("lint.deny-warnings".to_string(), "true".to_string()));
        }

        overrides
    }
}

/// Execute the `reqlint check` command
pub async fn execute(args: CheckArgs, ctx: &CommandContext) -> ReqlintResult<()> {
    let loaded = ctx.load_config(args.overrides()).await?;
    let targets = ctx.manifest_targets(&args.paths, &loaded)?;

    if targets.is_empty() {
        ctx.output.warn("No manifests found");
        return Ok(());
    }

    debug!(files = targets.len(), "Linting manifests");
    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for (path, result) in targets.iter().zip(lint_files(&targets, &loaded.config.rules)) {
        match result {
            Ok(report) => reports.push(report.with_path(ctx.display_path(path))),
            Err(e) => failures.push(e),
        }
    }

    match args.format {
        ReportFormat::Text => print_text(&reports, ctx),
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|e| ReqlintError::io("Failed to serialize report", e.into()))?;
            ctx.output.print(&json);
        },
    }

    let mut failures = failures.into_iter();
    if let Some(first) = failures.next() {
        let formatter = ErrorFormatter::with_colors(*ctx.output.colors());
        for other in failures {
            eprintln!("{}", formatter.format_error(&other));
        }
        return Err(first);
    }

    let deny_warnings = loaded.config.deny_warnings;
    if reports.iter().all(|report| report.is_clean(deny_warnings)) {
        Ok(())
    } else {
        Err(ReqlintError::LintFailed {
            errors: reports.iter().map(|r| r.errors).sum(),
            warnings: reports.iter().map(|r| r.warnings).sum(),
        })
    }
}

fn print_text(reports: &[LintReport], ctx: &CommandContext) {
    let formatter = ErrorFormatter::with_colors(*ctx.output.colors());

    for report in reports {
        let path = report.path.as_deref().unwrap_or("<manifest>");
        for diagnostic in &report.diagnostics {
            ctx.output.print(&formatter.format_diagnostic(path, diagnostic));
        }
    }

    ctx.output.print(&summary(reports));
}

/// One-line summary of a check run
pub fn summary(reports: &[LintReport]) -> String {
    let errors: usize = reports.iter().map(|r| r.errors).sum();
    let warnings: usize = reports.iter().map(|r| r.warnings).sum();
    let requirements: usize = reports.iter().map(|r| r.requirements).sum();

    if errors == 0 && warnings == 0 {
        format!(
            "No problems found in {} file(s) ({} requirement(s))",
            reports.len(),
            requirements
        )
    } else {
        format!(
            "Found {} error(s) and {} warning(s) in {} file(s)",
            errors,
            warnings,
            reports.len()
        )
    }
}
