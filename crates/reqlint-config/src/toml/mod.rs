//! reqlint.toml parsing and serialization

use std::collections::BTreeMap;

use reqlint_core::error::ReqlintError;
use reqlint_core::types::{RuleId, Severity};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ConfigResult;

/// Complete reqlint.toml configuration
///
/// Every value is optional so a layer only overrides what it sets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReqlintToml {
    /// Rule severities keyed by rule id
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, Severity>,

    /// Lint behaviour
    #[serde(default)]
    pub lint: LintSection,

    /// Formatter switches
    #[serde(default)]
    pub format: FormatSection,

    /// Manifest discovery
    #[serde(default)]
    pub manifest: ManifestSection,
}

/// `[lint]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct LintSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deny_warnings: Option<bool>,
}

/// `[format]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FormatSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize_names: Option<bool>,
}

/// `[manifest]` section
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestSection {
    /// Manifest paths, relative to the config file's directory
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl ReqlintToml {
    /// Rule overrides with validated ids
    pub fn rule_overrides(&self) -> ConfigResult<Vec<(RuleId, Severity)>> {
        self.rules
            .iter()
            .map(|(id, severity)| {
                id.parse::<RuleId>()
                    .map(|rule| (rule, *severity))
                    .map_err(|reason| ReqlintError::config(format!("rules.{}", id), reason))
            })
            .collect()
    }
}

/// Parse TOML string to ReqlintToml configuration
pub fn parse_reqlint_toml(content: &str) -> ConfigResult<ReqlintToml> {
    // First try with toml_edit for better error reporting
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| toml_error(content, e.message(), e.span()))?;

    // Then parse with serde for type safety
    let config: ReqlintToml =
        toml::from_str(content).map_err(|e| toml_error(content, e.message(), e.span()))?;

    validate_config(&config)?;
    debug!(rules = config.rules.len(), "Parsed reqlint.toml");

    Ok(config)
}

/// Validate configuration completeness
pub fn validate_config(config: &ReqlintToml) -> ConfigResult<()> {
    config.rule_overrides()?;

    for file in &config.manifest.files {
        if file.trim().is_empty() {
            return Err(ReqlintError::config(
                "manifest.files",
                "manifest paths must not be empty",
            ));
        }
    }

    Ok(())
}

/// Load and parse reqlint.toml from file path
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<ReqlintToml> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReqlintError::io(format!("Failed to read {}", path), e))?;

    parse_reqlint_toml(&content).map_err(|e| match e {
        ReqlintError::TomlParse {
            message,
            line,
            column,
        } => ReqlintError::TomlParse {
            message: format!("In file {}: {}", path, message),
            line,
            column,
        },
        ReqlintError::ConfigValidation { field, reason } => ReqlintError::ConfigValidation {
            field,
            reason: format!("In file {}: {}", path, reason),
        },
        other => other,
    })
}

/// Commented reqlint.toml listing every rule at its default severity
pub fn default_config_toml() -> String {
    let mut out = String::from("# reqlint configuration\n\n[rules]\n");

    for rule in RuleId::ALL {
        out.push_str(&format!(
            "# {}\n{} = \"{}\"\n",
            rule.description(),
            rule.as_str(),
            rule.default_severity()
        ));
    }

    out.push_str(
        "\n[lint]\ndeny-warnings = false\n\n[format]\nsort = false\nnormalize-names = false\n\n[manifest]\nfiles = [\"requirements.txt\"]\n",
    );
    out
}

/// Turn a byte span into a 1-based line and column
fn toml_error(content: &str, message: &str, span: Option<std::ops::Range<usize>>) -> ReqlintError {
    let (line, column) = span
        .map(|range| line_column(content, range.start))
        .unwrap_or((0, 0));

    ReqlintError::TomlParse {
        message: message.trim().to_string(),
        line,
        column,
    }
}

fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    (line, column)
}
