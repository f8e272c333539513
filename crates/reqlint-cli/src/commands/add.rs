//! `reqlint add` command implementation.

use clap::Args;
use reqlint_core::error::ReqlintResult;
use reqlint_manifest::{load_from_file, save_to_file, EditOutcome, Manifest};

use super::{parse_requirement, CommandContext};

#[derive(Debug, Clone, Default, Args)]
pub struct AddArgs {
    /// Requirement to add, e.g. `pandas==2.2.2`
    pub requirement: String,

    /// Group header to add the requirement under
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Manifest to edit (defaults to the configured manifest)
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,
}

/// Execute the `reqlint add` command
pub async fn execute(args: AddArgs, ctx: &CommandContext) -> ReqlintResult<()> {
    let requirement = parse_requirement(&args.requirement)?;

    let loaded = ctx.load_config(Vec::new()).await?;
    let path = ctx.manifest_target(args.file.as_deref(), &loaded);

    let mut manifest = if path.exists() {
        load_from_file(&path).await?
    } else {
        ctx.output.info(&format!("Creating {}", ctx.display_path(&path)));
        Manifest::new()
    };

    let shown = requirement.to_string();
    let outcome = manifest.upsert(requirement, args.group.as_deref())?;
    save_to_file(&path, &manifest.render()).await?;

    let file = ctx.display_path(&path);
    match outcome {
        EditOutcome::Added { line } => {
            ctx.output.success(&format!("Added {} to {}:{}", shown, file, line));
        },
        EditOutcome::Updated { line, previous } if previous.to_string() == shown => {
            ctx.output.info(&format!("{} is already in {}:{}", shown, file, line));
        },
        EditOutcome::Updated { line, previous } => {
            ctx.output.success(&format!("Updated {} to {} in {}:{}", previous, shown, file, line));
        },
    }

    Ok(())
}
