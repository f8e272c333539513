//! `reqlint init` command implementation.
//!
//! Writes a reqlint.toml listing every rule at its default severity.

use reqlint_config::{default_config_toml, CONFIG_FILE_NAME};
use reqlint_core::error::{ReqlintError, ReqlintResult};

use super::CommandContext;

/// Execute the `reqlint init` command
pub async fn execute(ctx: &CommandContext) -> ReqlintResult<()> {
    let config_path = ctx.cwd.join(CONFIG_FILE_NAME);

    if config_path.exists() {
        ctx.output
            .info(&format!("{} already exists, skipping initialization", CONFIG_FILE_NAME));
        return Ok(());
    }

    tokio::fs::write(&config_path, default_config_toml())
        .await
        .map_err(|e| ReqlintError::io(format!("Failed to write {}", config_path), e))?;

    ctx.output.success(&format!("Created {}", CONFIG_FILE_NAME));
    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.info("  reqlint check");
    ctx.output.info("  reqlint fmt --check");

    Ok(())
}
