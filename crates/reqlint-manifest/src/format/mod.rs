//! Canonical manifest formatting

use serde::{Deserialize, Serialize};

use crate::document::{render_requirement_line, Entry, Manifest};

/// Formatting switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FormatOptions {
    /// Sort requirements by normalized name within each group
    #[serde(default)]
    pub sort: bool,
    /// Write names in normalized form
    #[serde(default)]
    pub normalize_names: bool,
}

/// Render a manifest in canonical form
///
/// Group order and comments are preserved. Blank runs collapse to one
/// line and the result ends with a single newline unless it is empty.
pub fn format_manifest(manifest: &Manifest, options: &FormatOptions) -> String {
    let mut rendered: Vec<String> = manifest
        .lines
        .iter()
        .map(|line| match &line.entry {
            Entry::Blank { .. } => String::new(),
            Entry::Comment { raw } => raw.trim().to_string(),
            Entry::Requirement {
                requirement,
                inline_comment,
                ..
            } => render_requirement_line(
                &requirement.render(options.normalize_names),
                inline_comment.as_deref(),
            ),
            Entry::Invalid { raw, .. } => raw.clone(),
        })
        .collect();

    if options.sort {
        for group in manifest.groups() {
            let slots: Vec<usize> = group
                .members
                .iter()
                .copied()
                .filter(|&i| manifest.lines[i].entry.requirement().is_some())
                .collect();

            let mut sorted: Vec<(String, String)> = slots
                .iter()
                .filter_map(|&i| {
                    manifest.lines[i]
                        .entry
                        .requirement()
                        .map(|req| (req.name.normalized().to_string(), rendered[i].clone()))
                })
                .collect();
            sorted.sort_by(|a, b| a.0.cmp(&b.0));

            for (slot, (_, text)) in slots.into_iter().zip(sorted) {
                rendered[slot] = text;
            }
        }
    }

    let mut output: Vec<String> = Vec::with_capacity(rendered.len());
    for line in rendered {
        let blank = line.trim().is_empty();
        if blank && output.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        output.push(if blank { String::new() } else { line });
    }
    while output.last().is_some_and(|last| last.is_empty()) {
        output.pop();
    }

    if output.is_empty() {
        String::new()
    } else {
        let mut text = output.join("\n");
        text.push('\n');
        text
    }
}

/// Check whether a manifest is already in canonical form
pub fn is_formatted(source: &str, manifest: &Manifest, options: &FormatOptions) -> bool {
    format_manifest(manifest, options) == source
}
