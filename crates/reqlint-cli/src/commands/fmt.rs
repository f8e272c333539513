//! `reqlint fmt` command implementation.

use clap::Args;
use reqlint_core::error::{ReqlintError, ReqlintResult};
use reqlint_manifest::{format_manifest, is_formatted, parse_manifest, save_to_file};
use tracing::debug;

use super::CommandContext;

#[derive(Debug, Clone, Default, Args)]
pub struct FmtArgs {
    /// Manifest files or directories to format
    pub paths: Vec<String>,

    /// Report files that would change without writing them
    #[arg(long)]
    pub check: bool,

    /// Sort requirements by name within each group
    #[arg(long)]
    pub sort: bool,

    /// Write package names in normalized form
    #[arg(long)]
    pub normalize_names: bool,
}

impl FmtArgs {
    pub fn overrides(&self) -> Vec<(String, String)> {
        let mut overrides = Vec::new();
        if self.sort {
            overrides.push(("format.sort".to_string(), "true".to_string()));
        }
        if self.normalize_names {
            overrides.push(("format.normalize-names".to_string(), "true".to_string()));
        }
        overrides
    }
}

/// Execute the `reqlint fmt` command
pub async fn execute(args: FmtArgs, ctx: &CommandContext) -> ReqlintResult<()> {
    let loaded = ctx.load_config(args.overrides()).await?;
    let options = loaded.config.format;
    let targets = ctx.manifest_targets(&args.paths, &loaded)?;

    let mut changed = 0;
    for path in &targets {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReqlintError::io(format!("Failed to read {}", path), e))?;
        let manifest = parse_manifest(&source);

        if is_formatted(&source, &manifest, &options) {
            debug!(path = %path, "Already formatted");
            continue;
        }

        changed += 1;
        let shown = ctx.display_path(path);
        if args.check {
            ctx.output.print(&format!("Would reformat {}", shown));
        } else {
            save_to_file(path, &format_manifest(&manifest, &options)).await?;
            ctx.output.success(&format!("Formatted {}", shown));
        }
    }

    if args.check && changed > 0 {
        return Err(ReqlintError::FormatCheckFailed { count: changed });
    }

    let unchanged = targets.len() - changed;
    if args.check {
        ctx.output.info(&format!("{} file(s) already formatted", unchanged));
    } else {
        ctx.output.info(&format!(
            "{} file(s) reformatted, {} file(s) left unchanged",
            changed, unchanged
        ));
    }

    Ok(())
}
