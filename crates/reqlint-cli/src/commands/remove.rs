//! `reqlint remove` command implementation.

use clap::Args;
use reqlint_core::error::{ReqlintError, ReqlintResult};
use reqlint_core::types::PackageName;
use reqlint_manifest::{load_from_file, save_to_file};

use super::CommandContext;

#[derive(Debug, Clone, Default, Args)]
pub struct RemoveArgs {
    /// Package to remove; case and `-_.` differences are ignored
    pub name: String,

    /// Manifest to edit (defaults to the configured manifest)
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,
}

/// Execute the `reqlint remove` command
pub async fn execute(args: RemoveArgs, ctx: &CommandContext) -> ReqlintResult<()> {
    let name = PackageName::new(args.name.trim()).map_err(|e| ReqlintError::InvalidName {
        name: args.name.clone(),
        reason: e.to_string(),
    })?;

    let loaded = ctx.load_config(Vec::new()).await?;
    let path = ctx.manifest_target(args.file.as_deref(), &loaded);

    let mut manifest = load_from_file(&path).await?;
    let removed = manifest.remove(&name)?;
    save_to_file(&path, &manifest.render()).await?;

    ctx.output
        .success(&format!("Removed {} from {}", removed, ctx.display_path(&path)));
    Ok(())
}
