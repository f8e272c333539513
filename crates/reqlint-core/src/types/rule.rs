//! Lint rule identifiers and severities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lint rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    Syntax,
    InvalidVersion,
    UnsupportedOperator,
    Duplicate,
    Conflict,
    Unpinned,
    MinimumOnly,
    Unsorted,
    NonNormalizedName,
}

/// How a rule finding is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Allow,
    Warn,
    Error,
}

impl RuleId {
    /// Every rule, in reporting order
    pub const ALL: [RuleId; 9] = [
        RuleId::Syntax,
        RuleId::InvalidVersion,
        RuleId::UnsupportedOperator,
        RuleId::Duplicate,
        RuleId::Conflict,
        RuleId::Unpinned,
        RuleId::MinimumOnly,
        RuleId::Unsorted,
        RuleId::NonNormalizedName,
    ];

    /// Stable kebab-case id used in config files and output
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Syntax => "syntax",
            RuleId::InvalidVersion => "invalid-version",
            RuleId::UnsupportedOperator => "unsupported-operator",
            RuleId::Duplicate => "duplicate",
            RuleId::Conflict => "conflict",
            RuleId::Unpinned => "unpinned",
            RuleId::MinimumOnly => "minimum-only",
            RuleId::Unsorted => "unsorted",
            RuleId::NonNormalizedName => "non-normalized-name",
        }
    }

    /// Severity used when no configuration mentions the rule
    pub fn default_severity(&self) -> Severity {
        match self {
            RuleId::Syntax
            | RuleId::InvalidVersion
            | RuleId::UnsupportedOperator
            | RuleId::Duplicate
            | RuleId::Conflict => Severity::Error,
            RuleId::Unpinned => Severity::Warn,
            RuleId::MinimumOnly | RuleId::Unsorted | RuleId::NonNormalizedName => Severity::Allow,
        }
    }

    /// One-line description
    pub fn description(&self) -> &'static str {
        match self {
            RuleId::Syntax => "line is not blank, a comment, or a requirement",
            RuleId::InvalidVersion => "version string is not well-formed",
            RuleId::UnsupportedOperator => "operator other than '==' or '>='",
            RuleId::Duplicate => "package listed more than once",
            RuleId::Conflict => "entries for one package cannot all be satisfied",
            RuleId::Unpinned => "requirement has no version",
            RuleId::MinimumOnly => "requirement has a lower bound but no exact pin",
            RuleId::Unsorted => "requirements in a group are not sorted by name",
            RuleId::NonNormalizedName => "package name is not in normalized form",
        }
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        RuleId::ALL
            .into_iter()
            .find(|rule| rule.as_str() == wanted)
            .ok_or_else(|| format!("unknown rule '{}'", s))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Allow => "allow",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" | "off" => Ok(Severity::Allow),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" | "deny" => Ok(Severity::Error),
            other => Err(format!(
                "unknown severity '{}', expected allow, warn or error",
                other
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
