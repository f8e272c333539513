//! Requirement types.
//!
//! A requirement is a package name, optional extras, and one of three
//! version forms: bare (`name`), exact pin (`name==1.0`) or minimum bound
//! (`name>=1.0`).

use super::{NameError, PackageName, Version, VersionError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Single requirement line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: PackageName,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
    pub spec: VersionSpec,
}

/// Version constraint attached to a requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "version", rename_all = "kebab-case")]
pub enum VersionSpec {
    /// No version given
    Any,
    /// `==version`
    Exact(Version),
    /// `>=version`
    Minimum(Version),
}

/// Supported comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Exact,   // ==
    Minimum, // >=
}

/// Requirement parse failure with the byte offset it was found at
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct RequirementError {
    pub kind: RequirementErrorKind,
    pub offset: usize,
}

/// What went wrong while parsing a requirement
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequirementErrorKind {
    #[error("requirement is empty")]
    Empty,

    #[error("{0}")]
    InvalidName(NameError),

    #[error("malformed extras '{text}'")]
    InvalidExtras { text: String },

    #[error("unsupported operator '{operator}'")]
    UnsupportedOperator { operator: String },

    #[error("missing version after '{operator}'")]
    MissingVersion { operator: String },

    #[error("invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        source: VersionError,
    },

    #[error("only one version constraint is allowed, found '{text}'")]
    MultipleConstraints { text: String },

    #[error("environment markers are not supported: '{text}'")]
    EnvironmentMarker { text: String },

    #[error("unexpected text '{text}'")]
    UnexpectedText { text: String },
}

impl RequirementError {
    fn at(kind: RequirementErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// 1-based column within the parsed text
    pub fn column(&self) -> usize {
        self.offset + 1
    }
}

impl Operator {
    /// Operator as written in a manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Exact => "==",
            Operator::Minimum => ">=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl VersionSpec {
    /// Operator for this spec, if any
    pub fn operator(&self) -> Option<Operator> {
        match self {
            VersionSpec::Any => None,
            VersionSpec::Exact(_) => Some(Operator::Exact),
            VersionSpec::Minimum(_) => Some(Operator::Minimum),
        }
    }

    /// Version carried by this spec, if any
    pub fn version(&self) -> Option<&Version> {
        match self {
            VersionSpec::Any => None,
            VersionSpec::Exact(v) | VersionSpec::Minimum(v) => Some(v),
        }
    }

    /// Check if a concrete version satisfies this spec
    ///
    /// A pin without a local label also admits local builds of it, so
    /// `==1.0` admits `1.0+cpu`.
    pub fn admits(&self, candidate: &Version) -> bool {
        match self {
            VersionSpec::Any => true,
            VersionSpec::Exact(v) if v.local.is_none() => &candidate.public() == v,
            VersionSpec::Exact(v) => candidate == v,
            VersionSpec::Minimum(v) => candidate >= v,
        }
    }

    /// Check if some version satisfies both specs
    pub fn intersects(&self, other: &VersionSpec) -> bool {
        match (self, other) {
            (VersionSpec::Any, _) | (_, VersionSpec::Any) => true,
            (VersionSpec::Exact(a), VersionSpec::Exact(b)) => self.admits(b) || other.admits(a),
            (VersionSpec::Exact(pin), VersionSpec::Minimum(floor))
            | (VersionSpec::Minimum(floor), VersionSpec::Exact(pin)) => pin >= floor,
            (VersionSpec::Minimum(_), VersionSpec::Minimum(_)) => true,
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.operator(), self.version()) {
            (Some(op), Some(v)) => write!(f, "{}{}", op, v),
            _ => Ok(()),
        }
    }
}

impl Requirement {
    /// Create a requirement without extras
    pub fn new(name: PackageName, spec: VersionSpec) -> Self {
        Self {
            name,
            extras: Vec::new(),
            spec,
        }
    }

    /// Parse a requirement (no comments, no surrounding whitespace needed)
    pub fn parse(input: &str) -> Result<Self, RequirementError> {
        let leading = input.len() - input.trim_start().len();
        let text = input.trim();
        if text.is_empty() {
            return Err(RequirementError::at(RequirementErrorKind::Empty, 0));
        }

        let offset_of = |rest: &str| leading + text.len() - rest.len();

        if let Some(marker) = text.find(';') {
            return Err(RequirementError::at(
                RequirementErrorKind::EnvironmentMarker {
                    text: text[marker..].to_string(),
                },
                leading + marker,
            ));
        }

        // Package name
        let name_len = text
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
            .count();
        let name = PackageName::new(&text[..name_len]).map_err(|e| {
            RequirementError::at(RequirementErrorKind::InvalidName(e), leading)
        })?;
        let mut rest = text[name_len..].trim_start();

        // Extras
        let mut extras = Vec::new();
        if let Some(after_bracket) = rest.strip_prefix('[') {
            let bad_extras = |text: &str| {
                RequirementError::at(
                    RequirementErrorKind::InvalidExtras {
                        text: text.to_string(),
                    },
                    offset_of(rest),
                )
            };

            let close = after_bracket.find(']').ok_or_else(|| bad_extras(rest))?;
            for extra in after_bracket[..close].split(',') {
                let extra = extra.trim();
                if !PackageName::is_valid(extra) {
                    return Err(bad_extras(&rest[..close + 2]));
                }
                extras.push(extra.to_string());
            }
            rest = after_bracket[close + 1..].trim_start();
        }

        if rest.is_empty() {
            return Ok(Self {
                name,
                extras,
                spec: VersionSpec::Any,
            });
        }

        // Operator
        let op_len = rest
            .bytes()
            .take_while(|b| matches!(b, b'=' | b'<' | b'>' | b'!' | b'~'))
            .count();
        let op_text = &rest[..op_len];
        let op = match op_text {
            "==" => Operator::Exact,
            ">=" => Operator::Minimum,
            "" => {
                return Err(RequirementError::at(
                    RequirementErrorKind::UnexpectedText {
                        text: rest.to_string(),
                    },
                    offset_of(rest),
                ))
            },
            other => {
                return Err(RequirementError::at(
                    RequirementErrorKind::UnsupportedOperator {
                        operator: other.to_string(),
                    },
                    offset_of(rest),
                ))
            },
        };

        let version_text = rest[op_len..].trim();
        let version_offset = offset_of(rest[op_len..].trim_start());
        if version_text.is_empty() {
            return Err(RequirementError::at(
                RequirementErrorKind::MissingVersion {
                    operator: op_text.to_string(),
                },
                offset_of(rest),
            ));
        }

        if version_text.contains(',') {
            return Err(RequirementError::at(
                RequirementErrorKind::MultipleConstraints {
                    text: rest.to_string(),
                },
                offset_of(rest),
            ));
        }

        let version = Version::from_str(version_text).map_err(|source| {
            RequirementError::at(
                RequirementErrorKind::InvalidVersion {
                    version: version_text.to_string(),
                    source,
                },
                version_offset,
            )
        })?;

        let spec = match op {
            Operator::Exact => VersionSpec::Exact(version),
            Operator::Minimum => VersionSpec::Minimum(version),
        };

        Ok(Self { name, extras, spec })
    }

    /// Render in canonical form, optionally with the normalized name
    pub fn render(&self, normalize_name: bool) -> String {
        let mut out = if normalize_name {
            self.name.normalized().to_string()
        } else {
            self.name.as_str().to_string()
        };

        if !self.extras.is_empty() {
            out.push('[');
            out.push_str(&self.extras.join(","));
            out.push(']');
        }

        out.push_str(&self.spec.to_string());
        out
    }
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(s: &str) -> Requirement {
        Requirement::parse(s).unwrap()
    }

    fn kind(s: &str) -> RequirementErrorKind {
        Requirement::parse(s).unwrap_err().kind
    }

    #[test]
    fn test_three_forms() {
        let bare = req("streamlit");
        assert_eq!(bare.name.as_str(), "streamlit");
        assert_eq!(bare.spec, VersionSpec::Any);

        let pinned = req("pandas==2.2.2");
        assert_eq!(pinned.spec.operator(), Some(Operator::Exact));
        assert_eq!(pinned.spec.version().unwrap().to_string(), "2.2.2");

        let floor = req("openai>=1.30.0");
        assert_eq!(floor.spec.operator(), Some(Operator::Minimum));
    }

    #[test]
    fn test_whitespace_and_extras() {
        let r = req("  uvicorn[standard, watch] >= 0.29 ");
        assert_eq!(r.extras, vec!["standard".to_string(), "watch".to_string()]);
        assert_eq!(r.to_string(), "uvicorn[standard,watch]>=0.29");

        let r = req("PyYAML == 6.0.1");
        assert_eq!(r.render(true), "pyyaml==6.0.1");
    }

    #[test]
    fn test_rejected_operators() {
        for input in ["a<=1.0", "a<1.0", "a>1.0", "a!=1.0", "a~=1.0", "a===1.0"] {
            assert!(
                matches!(kind(input), RequirementErrorKind::UnsupportedOperator { .. }),
                "expected unsupported operator for {}",
                input
            );
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(kind(""), RequirementErrorKind::Empty);
        assert!(matches!(kind("==1.0"), RequirementErrorKind::InvalidName(_)));
        assert!(matches!(kind("pkg=="), RequirementErrorKind::MissingVersion { .. }));
        assert!(matches!(kind("pkg[extra"), RequirementErrorKind::InvalidExtras { .. }));
        assert!(matches!(kind("pkg[]"), RequirementErrorKind::InvalidExtras { .. }));
        assert!(matches!(kind("pkg 1.0"), RequirementErrorKind::UnexpectedText { .. }));
        assert!(matches!(
            kind("pkg>=1.0,<2.0"),
            RequirementErrorKind::MultipleConstraints { .. }
        ));
        assert!(matches!(
            kind("pkg; python_version < '3.8'"),
            RequirementErrorKind::EnvironmentMarker { .. }
        ));
        assert!(matches!(
            kind("pkg==one"),
            RequirementErrorKind::InvalidVersion { .. }
        ));
    }

    #[test]
    fn test_error_columns() {
        let err = Requirement::parse("pkg==one").unwrap_err();
        assert_eq!(err.column(), 6);

        let err = Requirement::parse("  pkg ~= 1.0").unwrap_err();
        assert_eq!(err.column(), 7);
    }

    #[test]
    fn test_spec_admits() {
        let v = |s: &str| Version::from_str(s).unwrap();
        assert!(VersionSpec::Any.admits(&v("0.1")));
        assert!(VersionSpec::Exact(v("1.0")).admits(&v("1.0.0")));
        assert!(!VersionSpec::Exact(v("1.0")).admits(&v("1.1")));
        assert!(VersionSpec::Minimum(v("1.0")).admits(&v("1.1")));
        assert!(!VersionSpec::Minimum(v("1.0")).admits(&v("1.0rc1")));
    }

    #[test]
    fn test_pin_admits_local_builds() {
        let v = |s: &str| Version::from_str(s).unwrap();
        assert!(VersionSpec::Exact(v("1.0")).admits(&v("1.0+cpu")));
        assert!(!VersionSpec::Exact(v("1.0+cpu")).admits(&v("1.0")));
        assert!(!VersionSpec::Exact(v("1.0+cpu")).admits(&v("1.0+cu121")));

        let exact = |s: &str| VersionSpec::Exact(v(s));
        assert!(exact("1.0").intersects(&exact("1.0+cpu")));
        assert!(exact("1.0+cpu").intersects(&exact("1.0")));
        assert!(!exact("1.0+cpu").intersects(&exact("1.0+cu121")));
    }

    #[test]
    fn test_spec_intersects() {
        let exact = |s: &str| VersionSpec::Exact(Version::from_str(s).unwrap());
        let min = |s: &str| VersionSpec::Minimum(Version::from_str(s).unwrap());

        assert!(exact("1.0").intersects(&exact("1.0.0")));
        assert!(!exact("1.0").intersects(&exact("1.1")));
        assert!(!exact("1.0").intersects(&min("2.0")));
        assert!(min("2.0").intersects(&exact("2.1")));
        assert!(min("1.0").intersects(&min("3.0")));
        assert!(VersionSpec::Any.intersects(&exact("1.0")));
    }

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(req("pandas==2.2.2")).unwrap();
        assert_eq!(json["name"], "pandas");
        assert_eq!(json["spec"]["kind"], "exact");
        assert_eq!(json["spec"]["version"], "2.2.2");
        assert!(json.get("extras").is_none());
    }
}
