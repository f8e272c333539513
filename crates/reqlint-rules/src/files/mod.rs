//! Linting manifests on disk

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use reqlint_config::RuleSettings;
use reqlint_core::error::ReqlintError;
use reqlint_manifest::parse_manifest;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::checks::lint;
use crate::diagnostic::LintReport;
use crate::RulesResult;

/// Lint manifest text, labelling the report with `path`
pub fn lint_source(path: impl Into<String>, content: &str, settings: &RuleSettings) -> LintReport {
    lint(&parse_manifest(content), settings).with_path(path)
}

/// Read and lint a single manifest
pub fn lint_file(path: &Utf8Path, settings: &RuleSettings) -> RulesResult<LintReport> {
    let content = fs::read_to_string(path)
        .map_err(|e| ReqlintError::io(format!("Failed to read {}", path), e))?;

    debug!(path = %path, bytes = content.len(), "Linting manifest");
    Ok(lint_source(path.as_str(), &content, settings))
}

/// Lint many manifests in parallel
///
/// Results come back in the order of `paths`; one unreadable file does not
/// stop the others.
pub fn lint_files(paths: &[Utf8PathBuf], settings: &RuleSettings) -> Vec<RulesResult<LintReport>> {
    paths
        .par_iter()
        .map(|path| lint_file(path, settings))
        .collect()
}

/// Check if a file name looks like a requirements manifest
pub fn is_manifest_name(file_name: &str) -> bool {
    file_name.ends_with(".txt")
        && (file_name.starts_with("requirements") || file_name.ends_with(".requirements.txt"))
}

/// Find manifests under `dir`, sorted for deterministic output
///
/// Hidden directories are skipped.
pub fn discover_manifests(dir: &Utf8Path) -> RulesResult<Vec<Utf8PathBuf>> {
    if !dir.is_dir() {
        return Err(ReqlintError::io(
            format!("Failed to read directory {}", dir),
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut manifests: Vec<Utf8PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry");
                None
            },
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.file_name().to_str().is_some_and(is_manifest_name))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .collect();

    manifests.sort();
    debug!(dir = %dir, found = manifests.len(), "Discovered manifests");

    Ok(manifests)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
