//! `reqlint list` command implementation.

use clap::Args;
use reqlint_core::error::{ReqlintError, ReqlintResult};
use reqlint_core::types::Requirement;
use reqlint_manifest::{load_from_file, Manifest};
use serde::Serialize;

use super::CommandContext;

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Manifest to list (defaults to the configured manifest)
    pub path: Option<String>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Only list requirements under this group header
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,
}

/// Requirements under one group header
#[derive(Debug, Serialize)]
pub struct ListedGroup<'a> {
    pub label: Option<String>,
    pub requirements: Vec<ListedRequirement<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ListedRequirement<'a> {
    pub line: usize,
    #[serde(flatten)]
    pub requirement: &'a Requirement,
}

/// Execute the `reqlint list` command
pub async fn execute(args: ListArgs, ctx: &CommandContext) -> ReqlintResult<()> {
    let loaded = ctx.load_config(Vec::new()).await?;
    let path = ctx.manifest_target(args.path.as_deref(), &loaded);
    let manifest = load_from_file(&path).await?;

    let groups = collect_groups(&manifest, args.group.as_deref())?;

    if args.json {
        let json = serde_json::to_string_pretty(&groups)
            .map_err(|e| ReqlintError::io("Failed to serialize requirements", e.into()))?;
        ctx.output.print(&json);
    } else {
        ctx.output.print(&render_groups(&groups).trim_end().to_string());
    }

    Ok(())
}

/// Requirements by group, optionally narrowed to one group label
pub fn collect_groups<'a>(manifest: &'a Manifest, only: Option<&str>) -> ReqlintResult<Vec<ListedGroup<'a>>> {
    let groups = match only {
        Some(label) => {
            let group = manifest.group(label).ok_or_else(|| {
                ReqlintError::config("group", format!("no group labelled '{}' in the manifest", label))
            })?;
            vec![group]
        },
        None => manifest.groups(),
    };

    Ok(groups
        .into_iter()
        .map(|group| ListedGroup {
            label: group.label,
            requirements: group
                .members
                .iter()
                .filter_map(|&index| {
                    let line = &manifest.lines[index];
                    line.entry.requirement().map(|requirement| ListedRequirement {
                        line: line.number,
                        requirement,
                    })
                })
                .collect(),
        })
        .collect())
}

/// Text listing: a header per group, one indented requirement per line
pub fn render_groups(groups: &[ListedGroup<'_>]) -> String {
    let mut out = String::new();

    for group in groups {
        out.push_str(group.label.as_deref().unwrap_or("(ungrouped)"));
        out.push('\n');
        for listed in &group.requirements {
            out.push_str(&format!("  {}\n", listed.requirement));
        }
        out.push('\n');
    }

    out
}
