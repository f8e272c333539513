//! Configuration layering, fallback logic, and environment overrides

use std::collections::HashMap;

use camino::{Utf8Path, Utf8PathBuf};
use reqlint_core::error::ReqlintError;
use reqlint_core::types::{RuleId, Severity};
use tracing::{debug, warn};

use crate::settings::LintConfig;
use crate::toml::ReqlintToml;
use crate::{ConfigResult, CONFIG_FILE_NAME};

/// Prefix shared by all environment overrides
pub const ENV_PREFIX: &str = "REQLINT_";

/// Main configuration loading interface
pub struct ConfigLoader {
    /// Current working directory
    cwd: Utf8PathBuf,
    /// Global config file, if one can be located
    global_path: Option<Utf8PathBuf>,
}

/// Configuration layering and merging
#[derive(Debug, Default)]
pub struct ConfigLayering {
    /// Global configuration
    global_config: Option<ReqlintToml>,
    /// Project configuration
    project_config: Option<ReqlintToml>,
    /// Environment overrides
    env_overrides: HashMap<String, String>,
    /// CLI flag overrides, applied in order
    cli_overrides: Vec<(String, String)>,
}

/// Configuration source tracking
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Built-in defaults
    Defaults,
    /// Global config file
    Global(Utf8PathBuf),
    /// Project reqlint.toml file
    Project(Utf8PathBuf),
    /// Environment variable
    Environment(String),
    /// CLI flag
    CommandLine,
}

/// Layered configuration with the sources that contributed to it
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: LintConfig,
    pub sources: Vec<ConfigSource>,
    /// Directory holding the project reqlint.toml, if found
    pub project_root: Option<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new(cwd: Utf8PathBuf) -> Self {
        let global_path = dirs::config_dir()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
            .map(|dir| dir.join("reqlint").join("config.toml"));

        Self { cwd, global_path }
    }

    /// Use a specific global config file, or none
    pub fn with_global_path(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.global_path = path;
        self
    }

    /// Find configuration file in project (walks up directory tree)
    pub fn resolve_config_path(&self, filename: &str) -> Option<Utf8PathBuf> {
        let mut current = Some(self.cwd.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(filename);
            if config_path.is_file() {
                return Some(config_path);
            }
            current = dir.parent();
        }

        None
    }

    /// Load project configuration, if any
    pub async fn load_project_config(&self) -> ConfigResult<Option<(ReqlintToml, Utf8PathBuf)>> {
        match self.resolve_config_path(CONFIG_FILE_NAME) {
            Some(path) => {
                let config = crate::toml::load_from_file(&path).await?;
                debug!(path = %path, "Loaded project config");
                Ok(Some((config, path)))
            },
            None => Ok(None),
        }
    }

    /// Load global configuration
    pub async fn load_global_config(&self) -> ConfigResult<Option<(ReqlintToml, Utf8PathBuf)>> {
        let Some(path) = &self.global_path else {
            return Ok(None);
        };

        if path.is_file() {
            let config = crate::toml::load_from_file(path).await?;
            debug!(path = %path, "Loaded global config");
            Ok(Some((config, path.clone())))
        } else {
            Ok(None)
        }
    }

    /// Load every layer and merge them
    pub async fn load(
        &self,
        env_overrides: HashMap<String, String>,
        cli_overrides: Vec<(String, String)>,
    ) -> ConfigResult<LoadedConfig> {
        let mut sources = vec![ConfigSource::Defaults];
        let mut layering = ConfigLayering::new();

        if let Some((global, path)) = self.load_global_config().await? {
            layering = layering.global(global);
            sources.push(ConfigSource::Global(path));
        }

        let mut project_root = None;
        if let Some((project, path)) = self.load_project_config().await? {
            project_root = path.parent().map(Utf8Path::to_path_buf);
            layering = layering.project(project);
            sources.push(ConfigSource::Project(path));
        }

        let mut env_keys: Vec<_> = env_overrides.keys().cloned().collect();
        env_keys.sort();
        sources.extend(env_keys.into_iter().map(ConfigSource::Environment));

        if !cli_overrides.is_empty() {
            sources.push(ConfigSource::CommandLine);
        }

        let config = layering.env(env_overrides).cli(cli_overrides).resolve()?;

        Ok(LoadedConfig {
            config,
            sources,
            project_root,
        })
    }
}

impl ConfigLayering {
    /// Create a new configuration layering system
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global(mut self, config: ReqlintToml) -> Self {
        self.global_config = Some(config);
        self
    }

    pub fn project(mut self, config: ReqlintToml) -> Self {
        self.project_config = Some(config);
        self
    }

    pub fn env(mut self, overrides: HashMap<String, String>) -> Self {
        self.env_overrides = overrides;
        self
    }

    pub fn cli(mut self, overrides: Vec<(String, String)>) -> Self {
        self.cli_overrides = overrides;
        self
    }

    /// Merge all layers: defaults < global < project < environment < CLI
    pub fn resolve(self) -> ConfigResult<LintConfig> {
        let mut merged = LintConfig::default();

        for layer in [self.global_config, self.project_config].into_iter().flatten() {
            Self::apply_file_layer(&mut merged, layer)?;
        }

        // Sorted so conflicting variables resolve the same way every run
        let mut env: Vec<_> = self.env_overrides.into_iter().collect();
        env.sort();
        for (key, value) in env {
            match env_key_to_setting(&key) {
                Some(setting) => apply_setting(&mut merged, &setting, &value, &key)?,
                None => warn!(variable = %key, "Ignoring unknown environment override"),
            }
        }

        for (key, value) in self.cli_overrides {
            apply_setting(&mut merged, &key, &value, "command line")?;
        }

        Ok(merged)
    }

    fn apply_file_layer(config: &mut LintConfig, layer: ReqlintToml) -> ConfigResult<()> {
        for (rule, severity) in layer.rule_overrides()? {
            config.rules.set(rule, severity);
        }

        if let Some(deny) = layer.lint.deny_warnings {
            config.deny_warnings = deny;
        }
        if let Some(sort) = layer.format.sort {
            config.format.sort = sort;
        }
        if let Some(normalize) = layer.format.normalize_names {
            config.format.normalize_names = normalize;
        }
        if !layer.manifest.files.is_empty() {
            config.manifest_files = layer.manifest.files;
        }

        Ok(())
    }

    /// Collect environment variable overrides
    pub fn collect_env_overrides() -> HashMap<String, String> {
        std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect()
    }
}

/// Map `REQLINT_RULE_UNPINNED` to `rule.unpinned` and so on
fn env_key_to_setting(key: &str) -> Option<String> {
    let rest = key.strip_prefix(ENV_PREFIX)?;

    if let Some(rule) = rest.strip_prefix("RULE_") {
        return Some(format!("rule.{}", rule.to_ascii_lowercase().replace('_', "-")));
    }

    match rest {
        "FORMAT_SORT" => Some("format.sort".to_string()),
        "FORMAT_NORMALIZE_NAMES" => Some("format.normalize-names".to_string()),
        "DENY_WARNINGS" => Some("lint.deny-warnings".to_string()),
        _ => None,
    }
}

/// Apply one dotted `key = value` override
fn apply_setting(config: &mut LintConfig, key: &str, value: &str, origin: &str) -> ConfigResult<()> {
    let invalid = |reason: String| ReqlintError::config(key, format!("{} (from {})", reason, origin));

    if let Some(rule) = key.strip_prefix("rule.") {
        let rule: RuleId = rule.parse().map_err(invalid)?;
        let severity: Severity = value.parse().map_err(invalid)?;
        config.rules.set(rule, severity);
        return Ok(());
    }

    match key {
        "format.sort" => config.format.sort = parse_bool(value).map_err(invalid)?,
        "format.normalize-names" => {
            config.format.normalize_names = parse_bool(value).map_err(invalid)?
        },
        "lint.deny-warnings" => config.deny_warnings = parse_bool(value).map_err(invalid)?,
        _ => return Err(invalid("unknown setting".to_string())),
    }

    Ok(())
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{}'", other)),
    }
}
