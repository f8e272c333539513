//! Package name type.
//!
//! Names compare by their normalized form: lowercase, with every run of
//! `-`, `_` and `.` collapsed into a single `-`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Package name as written, with its normalized form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName {
    raw: String,
    normalized: String,
}

/// Package name validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("package name is empty")]
    Empty,

    #[error("invalid character '{ch}' in package name '{name}'")]
    InvalidChar { name: String, ch: char },

    #[error("package name '{name}' must start and end with a letter or digit")]
    BadBoundary { name: String },
}

impl PackageName {
    /// Parse and validate a package name
    pub fn new(name: &str) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }

        if let Some(ch) = name.chars().find(|c| !is_name_char(*c)) {
            return Err(NameError::InvalidChar {
                name: name.to_string(),
                ch,
            });
        }

        let bytes = name.as_bytes();
        if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
            return Err(NameError::BadBoundary {
                name: name.to_string(),
            });
        }

        Ok(Self {
            raw: name.to_string(),
            normalized: normalize(name),
        })
    }

    /// Name exactly as written in the manifest
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized name used for comparison
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Check whether the written form is already normalized
    pub fn is_normalized(&self) -> bool {
        self.raw == self.normalized
    }

    /// Check if a string is a valid package name
    pub fn is_valid(name: &str) -> bool {
        Self::new(name).is_ok()
    }
}

/// Lowercase and collapse `-_.` runs into `-`
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
            }
            in_separator = true;
        } else {
            out.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }

    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl PartialEq for PackageName {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for PackageName {}

impl Hash for PackageName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl PartialOrd for PackageName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl FromStr for PackageName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for PackageName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.raw
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
