//! # reqlint
//!
//! Linter, formatter and editor for requirements manifests.
//!
//! This is the main entry point for the reqlint CLI tool. It handles command
//! parsing, sets up logging and error handling, and dispatches to the
//! appropriate command handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqlint_core::error::{ReqlintError, ReqlintResult};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Lint, format and edit requirements manifests
#[derive(Parser)]
#[command(name = "reqlint", version, about = "Lint, format and edit requirements manifests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint manifests
    Check(commands::check::CheckArgs),
    /// Rewrite manifests in canonical form
    Fmt(commands::fmt::FmtArgs),
    /// List requirements by group
    List(commands::list::ListArgs),
    /// Add a requirement or update its version
    Add(commands::add::AddArgs),
    /// Remove a requirement
    Remove(commands::remove::RemoveArgs),
    /// Write a default reqlint.toml
    Init,
    /// Show version information
    Version,
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting reqlint v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::from(e.exit_code())
        },
    }
}

fn run_cli(cli: Cli) -> ReqlintResult<()> {
    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| ReqlintError::io("Failed to create async runtime", e))?;

    rt.block_on(async {
        let ctx = CommandContext::new().await?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "reqlint={level},reqlint_core={level},reqlint_manifest={level},reqlint_config={level},reqlint_rules={level}"
        ))
    });

    // Logs go to stderr so `check --format json` stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("reqlint encountered an unexpected error: {}", panic_info);
        eprintln!("reqlint crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/reqlint/reqlint/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
