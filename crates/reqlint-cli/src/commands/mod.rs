//! Command implementations and dispatch logic.
//!
//! Each command is implemented as an async function that takes a
//! CommandContext.

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use reqlint_config::{ConfigLayering, ConfigLoader, LoadedConfig};
use reqlint_core::error::{ReqlintError, ReqlintResult};
use reqlint_core::types::{Requirement, RequirementError, RequirementErrorKind};
use reqlint_rules::discover_manifests;
use tracing::{debug, info};

pub mod add;
pub mod check;
pub mod fmt;
pub mod init;
pub mod list;
pub mod remove;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, Commands};

/// Command names offered in "did you mean" hints
const COMMANDS: [&str; 8] = ["check", "fmt", "list", "add", "remove", "init", "version", "help"];

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
    /// `REQLINT_*` variables captured at startup
    pub env: HashMap<String, String>,
    /// Whether to read the user's global config file
    pub use_global_config: bool,
}

impl CommandContext {
    /// Create a new command context
    pub async fn new() -> ReqlintResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ReqlintError::io("Failed to get current directory", e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
            ReqlintError::config("cwd", format!("{} is not valid UTF-8", path.display()))
        })?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
            env: ConfigLayering::collect_env_overrides(),
            use_global_config: true,
        })
    }

    /// Load layered configuration with the given command-line overrides
    pub async fn load_config(&self, cli_overrides: Vec<(String, String)>) -> ReqlintResult<LoadedConfig> {
        let mut loader = ConfigLoader::new(self.cwd.clone());
        if !self.use_global_config {
            loader = loader.with_global_path(None);
        }

        let loaded = loader.load(self.env.clone(), cli_overrides).await?;
        debug!(sources = ?loaded.sources, "Loaded configuration");
        Ok(loaded)
    }

    /// Resolve a user-supplied path against the working directory
    pub fn resolve(&self, path: &str) -> Utf8PathBuf {
        let path = Utf8Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Path as shown to the user, relative to the working directory when possible
    pub fn display_path(&self, path: &Utf8Path) -> String {
        path.strip_prefix(&self.cwd).unwrap_or(path).to_string()
    }

    /// Manifests a command should act on
    ///
    /// Directories expand to the manifests found beneath them. With no paths,
    /// the configured manifest files are used, relative to the directory
    /// holding reqlint.toml.
    pub fn manifest_targets(&self, paths: &[String], loaded: &LoadedConfig) -> ReqlintResult<Vec<Utf8PathBuf>> {
        let explicit = !paths.is_empty();
        let candidates: Vec<Utf8PathBuf> = if explicit {
            paths.iter().map(|path| self.resolve(path)).collect()
        } else {
            let base = loaded.project_root.as_deref().unwrap_or(&self.cwd);
            loaded
                .config
                .default_manifests()
                .iter()
                .map(|file| base.join(file))
                .collect()
        };

        let mut targets = Vec::new();
        for candidate in candidates {
            let found = if candidate.is_dir() {
                discover_manifests(&candidate)?
            } else {
                vec![candidate]
            };

            for path in found {
                if !targets.contains(&path) {
                    targets.push(path);
                }
            }
        }

        Ok(targets)
    }

    /// Manifest a single-file command should act on
    pub fn manifest_target(&self, file: Option<&str>, loaded: &LoadedConfig) -> Utf8PathBuf {
        match file {
            Some(file) => self.resolve(file),
            None => {
                let base = loaded.project_root.as_deref().unwrap_or(&self.cwd);
                let first = loaded.config.default_manifests().into_iter().next();
                base.join(first.unwrap_or_else(|| "requirements.txt".to_string()))
            },
        }
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> ReqlintResult<()> {
    match command {
        Commands::Check(args) => {
            info!("Checking manifests: {:?}", args.paths);
            check::execute(args, ctx).await
        },
        Commands::Fmt(args) => {
            info!("Formatting manifests (check: {})", args.check);
            fmt::execute(args, ctx).await
        },
        Commands::List(args) => {
            info!("Listing requirements (group: {:?})", args.group);
            list::execute(args, ctx).await
        },
        Commands::Add(args) => {
            info!("Adding requirement: {}", args.requirement);
            add::execute(args, ctx).await
        },
        Commands::Remove(args) => {
            info!("Removing requirement: {}", args.name);
            remove::execute(args, ctx).await
        },
        Commands::Init => {
            info!("Initializing reqlint.toml");
            init::execute(ctx).await
        },
        Commands::Version => {
            info!("Showing version information");
            show_version(ctx).await
        },
        Commands::External(args) => Err(unknown_command(&args)),
    }
}

/// Error for an unrecognized subcommand, with a hint when one is close
fn unknown_command(args: &[String]) -> ReqlintError {
    let name = args.first().map(String::as_str).unwrap_or_default();
    let hint = suggest_similar_command(name)
        .map(|suggestion| format!(" (did you mean '{}'?)", suggestion))
        .unwrap_or_default();

    ReqlintError::UnknownCommand {
        name: name.to_string(),
        hint,
    }
}

async fn show_version(ctx: &CommandContext) -> ReqlintResult<()> {
    ctx.output.print(&format!("reqlint v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.print(&format!("Built: {}", env!("BUILD_DATE")));
    ctx.output.print(&format!("Target: {}", env!("BUILD_TARGET")));
    ctx.output.print(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}

/// Turn a requirement parse failure into the matching error
pub fn requirement_error(input: &str, error: RequirementError) -> ReqlintError {
    let column = error.column();
    match error.kind {
        RequirementErrorKind::InvalidName(reason) => ReqlintError::InvalidName {
            name: input.trim().to_string(),
            reason: reason.to_string(),
        },
        RequirementErrorKind::UnsupportedOperator { operator } => ReqlintError::UnsupportedOperator {
            operator,
            requirement: input.trim().to_string(),
        },
        RequirementErrorKind::MultipleConstraints { text } => ReqlintError::UnsupportedOperator {
            operator: text,
            requirement: input.trim().to_string(),
        },
        RequirementErrorKind::InvalidVersion { version, source } => ReqlintError::InvalidVersion {
            version,
            reason: source.to_string(),
        },
        kind @ RequirementErrorKind::MissingVersion { .. } => ReqlintError::InvalidVersion {
            version: String::new(),
            reason: kind.to_string(),
        },
        kind => ReqlintError::ManifestParse {
            message: kind.to_string(),
            line: 1,
            column,
        },
    }
}

/// Parse a requirement given on the command line
pub fn parse_requirement(input: &str) -> ReqlintResult<Requirement> {
    Requirement::parse(input).map_err(|e| requirement_error(input, e))
}

/// Suggest similar commands based on edit distance
pub fn suggest_similar_command(input: &str) -> Option<String> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for command in COMMANDS {
        let distance = edit_distance(input, command);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(command);
        }
    }

    best_match.map(|s| s.to_string())
}

/// Calculate edit distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    // Single-row Levenshtein
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;

        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}
