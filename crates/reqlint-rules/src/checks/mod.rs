//! Rule checks over a parsed manifest

use indexmap::IndexMap;
use reqlint_config::RuleSettings;
use reqlint_core::types::{RequirementErrorKind, RuleId, Severity, VersionSpec};
use reqlint_manifest::{Entry, Manifest};
use tracing::debug;

use crate::constraints::ConstraintSet;
use crate::diagnostic::{Diagnostic, LintReport};

/// Run every enabled rule over a manifest
pub fn lint(manifest: &Manifest, settings: &RuleSettings) -> LintReport {
    let mut sink = Sink::new(settings);

    check_invalid_lines(manifest, &mut sink);
    check_duplicates(manifest, &mut sink);
    check_versions(manifest, &mut sink);
    check_names(manifest, &mut sink);
    check_order(manifest, &mut sink);

    let report = LintReport::new(manifest.len(), sink.diagnostics);
    debug!(
        requirements = report.requirements,
        errors = report.errors,
        warnings = report.warnings,
        "Linted manifest"
    );
    report
}

/// Collects diagnostics, dropping rules set to allow
struct Sink<'a> {
    settings: &'a RuleSettings,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Sink<'a> {
    fn new(settings: &'a RuleSettings) -> Self {
        Self {
            settings,
            diagnostics: Vec::new(),
        }
    }

    fn enabled(&self, rule: RuleId) -> bool {
        self.settings.is_enabled(rule)
    }

    /// Start a diagnostic at the configured severity for `rule`
    fn diagnostic(&self, rule: RuleId, line: usize, message: String) -> Diagnostic {
        Diagnostic::new(rule, self.settings.severity(rule), line, message)
    }

    fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity != Severity::Allow {
            self.diagnostics.push(diagnostic);
        }
    }
}

fn check_invalid_lines(manifest: &Manifest, sink: &mut Sink<'_>) {
    for (line, error) in manifest.invalid_lines() {
        let (rule, help) = match &error.kind {
            RequirementErrorKind::UnsupportedOperator { .. } => (
                RuleId::UnsupportedOperator,
                "only '==' and '>=' are allowed",
            ),
            RequirementErrorKind::MultipleConstraints { .. } => (
                RuleId::UnsupportedOperator,
                "keep a single '==' or '>=' constraint",
            ),
            RequirementErrorKind::InvalidVersion { .. } => (
                RuleId::InvalidVersion,
                "versions look like 1.2.3, 2.0rc1 or 1.0.post2",
            ),
            RequirementErrorKind::MissingVersion { .. } => (
                RuleId::InvalidVersion,
                "add a version after the operator",
            ),
            RequirementErrorKind::EnvironmentMarker { .. } => (
                RuleId::Syntax,
                "remove the ';' marker",
            ),
            _ => (
                RuleId::Syntax,
                "expected 'name', 'name==version' or 'name>=version'",
            ),
        };

        let diagnostic = sink
            .diagnostic(rule, line.number, error.to_string())
            .with_column(error.column())
            .with_help(help);
        sink.emit(diagnostic);
    }
}

fn check_duplicates(manifest: &Manifest, sink: &mut Sink<'_>) {
    let check_duplicate = sink.enabled(RuleId::Duplicate);
    let check_conflict = sink.enabled(RuleId::Conflict);
    if !check_duplicate && !check_conflict {
        return;
    }

    // First line and constraints seen for each normalized name, in file order
    let mut seen: IndexMap<&str, (usize, ConstraintSet)> = IndexMap::new();

    for (line, requirement) in manifest.requirements() {
        let name = requirement.name.normalized();
        let (first_line, constraints) = seen
            .entry(name)
            .or_insert_with(|| (line.number, ConstraintSet::new()));

        if *first_line != line.number && check_duplicate {
            let diagnostic = sink
                .diagnostic(
                    RuleId::Duplicate,
                    line.number,
                    format!(
                        "'{}' is already listed on line {}",
                        requirement.name, first_line
                    ),
                )
                .with_help("remove one of the entries");
            sink.emit(diagnostic);
        }

        constraints.add(line.number, requirement.spec.clone());
    }

    if !check_conflict {
        return;
    }

    for (name, (_, constraints)) in &seen {
        for conflict in constraints.conflicts() {
            let diagnostic = sink.diagnostic(
                RuleId::Conflict,
                conflict.line,
                format!(
                    "'{}{}' cannot be satisfied together with '{}{}' on line {}",
                    name, conflict.spec, name, conflict.first, conflict.first_line
                ),
            );
            sink.emit(diagnostic);
        }
    }
}

fn check_versions(manifest: &Manifest, sink: &mut Sink<'_>) {
    for (line, requirement) in manifest.requirements() {
        let diagnostic = match &requirement.spec {
            VersionSpec::Any => sink
                .diagnostic(
                    RuleId::Unpinned,
                    line.number,
                    format!("'{}' has no version constraint", requirement.name),
                )
                .with_help(format!("pin it with '{}==<version>'", requirement.name)),
            VersionSpec::Minimum(version) => sink
                .diagnostic(
                    RuleId::MinimumOnly,
                    line.number,
                    format!("'{}' only has a lower bound", requirement.name),
                )
                .with_help(format!(
                    "pin it with '{}=={}' for reproducible installs",
                    requirement.name, version
                )),
            VersionSpec::Exact(_) => continue,
        };
        sink.emit(diagnostic);
    }
}

fn check_names(manifest: &Manifest, sink: &mut Sink<'_>) {
    if !sink.enabled(RuleId::NonNormalizedName) {
        return;
    }

    for (line, requirement) in manifest.requirements() {
        if requirement.name.is_normalized() {
            continue;
        }

        let offset = line.entry.raw().find(requirement.name.as_str()).unwrap_or(0);
        let diagnostic = sink
            .diagnostic(
                RuleId::NonNormalizedName,
                line.number,
                format!(
                    "'{}' is not written in normalized form",
                    requirement.name
                ),
            )
            .with_column(offset + 1)
            .with_help(format!("write it as '{}'", requirement.name.normalized()));
        sink.emit(diagnostic);
    }
}

fn check_order(manifest: &Manifest, sink: &mut Sink<'_>) {
    if !sink.enabled(RuleId::Unsorted) {
        return;
    }

    for group in manifest.groups() {
        let mut previous: Option<&str> = None;

        for &index in &group.members {
            let line = &manifest.lines[index];
            let Entry::Requirement { requirement, .. } = &line.entry else {
                continue;
            };
            let name = requirement.name.normalized();

            if let Some(before) = previous {
                if name < before {
                    let diagnostic = sink
                        .diagnostic(
                            RuleId::Unsorted,
                            line.number,
                            format!("'{}' should come before '{}'", requirement.name, before),
                        )
                        .with_help("run 'reqlint fmt --sort'");
                    sink.emit(diagnostic);
                    continue;
                }
            }
            previous = Some(name);
        }
    }
}
