//! Version type for manifest requirements.
//!
//! Covers the version strings that show up in Python-style manifests:
//! `[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`. Versions keep the text
//! they were written with; comparison and equality use the parsed parts.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parsed version with the spelling it was written in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<PreRelease>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<String>,
    written: String,
}

/// Pre-release phase (a, b, rc)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha(u64),
    Beta(u64),
    Rc(u64),
}

/// Version parsing and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("version is empty")]
    Empty,

    #[error("Invalid version format: {input}")]
    InvalidFormat { input: String },

    #[error("Invalid number in version: {component}")]
    InvalidNumber { component: String },

    #[error("Invalid local version label: {local}")]
    InvalidLocal { local: String },
}

// Longest spellings first so "preview" is not read as "pre" + "view".
const PRE_KEYWORDS: &[(&str, fn(u64) -> PreRelease)] = &[
    ("alpha", PreRelease::Alpha),
    ("beta", PreRelease::Beta),
    ("preview", PreRelease::Rc),
    ("pre", PreRelease::Rc),
    ("rc", PreRelease::Rc),
    ("c", PreRelease::Rc),
    ("a", PreRelease::Alpha),
    ("b", PreRelease::Beta),
];

const POST_KEYWORDS: &[&str] = &["post", "rev", "r"];

impl Version {
    /// Create a final release from its segments
    pub fn new(release: &[u64]) -> Self {
        let mut version = Self {
            epoch: 0,
            release: release.to_vec(),
            pre: None,
            post: None,
            dev: None,
            local: None,
            written: String::new(),
        };
        version.written = version.canonical();
        version
    }

    /// Normalized rendering (`1.0rc1`, `2!1.0.post3`)
    pub fn canonical(&self) -> String {
        let mut out = String::new();

        if self.epoch != 0 {
            out.push_str(&format!("{}!", self.epoch));
        }

        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        out.push_str(&release.join("."));

        match self.pre {
            Some(PreRelease::Alpha(n)) => out.push_str(&format!("a{}", n)),
            Some(PreRelease::Beta(n)) => out.push_str(&format!("b{}", n)),
            Some(PreRelease::Rc(n)) => out.push_str(&format!("rc{}", n)),
            None => {},
        }

        if let Some(post) = self.post {
            out.push_str(&format!(".post{}", post));
        }

        if let Some(dev) = self.dev {
            out.push_str(&format!(".dev{}", dev));
        }

        if let Some(ref local) = self.local {
            out.push('+');
            out.push_str(local);
        }

        out
    }

    /// Same version with the `+local` label dropped
    pub fn public(&self) -> Version {
        let mut version = Self {
            local: None,
            written: String::new(),
            ..self.clone()
        };
        version.written = version.canonical();
        version
    }

    fn pre_key(&self) -> (u8, Option<PreRelease>) {
        match (self.pre, self.post, self.dev) {
            // 1.0.dev1 sorts before 1.0a1
            (None, None, Some(_)) => (0, None),
            (Some(pre), _, _) => (1, Some(pre)),
            _ => (2, None),
        }
    }

    fn post_key(&self) -> (u8, u64) {
        self.post.map_or((0, 0), |p| (1, p))
    }

    fn dev_key(&self) -> (u8, u64) {
        self.dev.map_or((1, 0), |d| (0, d))
    }

    fn release_cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

/// Byte cursor over a lowercased version string
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn eat_separator(&mut self) -> bool {
        if matches!(self.peek(), Some(b'.' | b'-' | b'_')) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn number(&mut self) -> Result<Option<u64>, VersionError> {
        let digits = self
            .rest()
            .bytes()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return Ok(None);
        }

        let text = &self.rest()[..digits];
        self.pos += digits;
        text.parse()
            .map(Some)
            .map_err(|_| VersionError::InvalidNumber {
                component: text.to_string(),
            })
    }

    /// Optional separator, keyword, optional separator, optional number
    fn tagged_number(&mut self, keyword: &str) -> Result<Option<u64>, VersionError> {
        let start = self.pos;
        self.eat_separator();
        if !self.eat(keyword) {
            self.pos = start;
            return Ok(None);
        }

        let before_number = self.pos;
        self.eat_separator();
        match self.number()? {
            Some(n) => Ok(Some(n)),
            None => {
                self.pos = before_number;
                Ok(Some(0))
            },
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let written = s.trim();
        if written.is_empty() {
            return Err(VersionError::Empty);
        }

        let lowered = written.to_ascii_lowercase();
        let invalid = || VersionError::InvalidFormat {
            input: written.to_string(),
        };

        // Split on '+' for the local label
        let (public, local) = match lowered.split_once('+') {
            Some((p, l)) => (p, Some(parse_local(l)?)),
            None => (lowered.as_str(), None),
        };
        let public = public.strip_prefix('v').unwrap_or(public);

        // Split on '!' for the epoch
        let (epoch, body) = match public.split_once('!') {
            Some((e, b)) => {
                let epoch = e.parse().map_err(|_| VersionError::InvalidNumber {
                    component: e.to_string(),
                })?;
                (epoch, b)
            },
            None => (0, public),
        };

        let mut cursor = Cursor {
            input: body,
            pos: 0,
        };

        // Release segments
        let mut release = Vec::new();
        loop {
            let segment = cursor.number()?.ok_or_else(invalid)?;
            release.push(segment);

            let after_segment = cursor.pos;
            if cursor.eat(".") && matches!(cursor.peek(), Some(b'0'..=b'9')) {
                continue;
            }
            cursor.pos = after_segment;
            break;
        }

        // Pre-release
        let mut pre = None;
        for (keyword, phase) in PRE_KEYWORDS {
            if let Some(n) = cursor.tagged_number(keyword)? {
                pre = Some(phase(n));
                break;
            }
        }

        // Post-release, including the implicit "-N" spelling
        let mut post = None;
        let implicit_start = cursor.pos;
        if cursor.eat("-") {
            match cursor.number()? {
                Some(n) => post = Some(n),
                None => cursor.pos = implicit_start,
            }
        }
        if post.is_none() {
            for keyword in POST_KEYWORDS {
                if let Some(n) = cursor.tagged_number(keyword)? {
                    post = Some(n);
                    break;
                }
            }
        }

        // Dev release
        let dev = cursor.tagged_number("dev")?;

        if !cursor.at_end() {
            return Err(invalid());
        }

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
            written: written.to_string(),
        })
    }
}

fn parse_local(local: &str) -> Result<String, VersionError> {
    let valid = !local.is_empty()
        && local
            .split(['.', '-', '_'])
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_alphanumeric()));

    if valid {
        Ok(local.replace(['-', '_'], "."))
    } else {
        Err(VersionError::InvalidLocal {
            local: local.to_string(),
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.written)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.written
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.release_cmp(other))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post_key().cmp(&other.post_key()))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}
