//! In-place manifest edits that keep order and comments

use reqlint_core::error::ReqlintError;
use reqlint_core::types::{PackageName, Requirement};
use tracing::debug;

use crate::document::{clean_label, Entry, Line, Manifest};
use crate::ManifestResult;

/// Result of an upsert
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// New requirement written at this 1-based line
    Added { line: usize },
    /// Existing requirement replaced at this 1-based line
    Updated { line: usize, previous: Requirement },
}

impl Manifest {
    /// Add a requirement or update the existing entry for the same package
    ///
    /// Updates happen in place and keep the inline comment. New entries go
    /// after the last member of `group`, under a fresh `# group` header when
    /// no such group exists, or after the last requirement or invalid line
    /// when `group` is `None`. A group label made only of `#`, `=`, `-`, `*`
    /// or whitespace is rejected.
    pub fn upsert(&mut self, requirement: Requirement, group: Option<&str>) -> ManifestResult<EditOutcome> {
        let label = match group {
            Some(raw) => Some(clean_label(raw).ok_or_else(|| {
                ReqlintError::config("group", format!("'{}' is not a usable group label", raw))
            })?),
            None => None,
        };

        if let Some(index) = self.find(&requirement.name) {
            let line = &mut self.lines[index];
            let (previous, inline_comment) = match &line.entry {
                Entry::Requirement {
                    requirement: previous,
                    inline_comment,
                    ..
                } => (previous.clone(), inline_comment.clone()),
                _ => unreachable!("find only returns requirement lines"),
            };

            debug!(package = %requirement.name, line = line.number, "Updating requirement");
            line.entry = Entry::from_requirement(requirement, inline_comment);
            return Ok(EditOutcome::Updated {
                line: line.number,
                previous,
            });
        }

        let was_empty = self.lines.is_empty();
        let index = match label.as_deref() {
            Some(label) => match self.group(label) {
                Some(existing) => existing
                    .members
                    .last()
                    .or(existing.header.last())
                    .map_or(self.lines.len(), |&i| i + 1),
                None => self.append_group_header(label),
            },
            None => self.end_of_payload(),
        };

        debug!(package = %requirement.name, index, ?label, "Adding requirement");
        self.lines.insert(
            index,
            Line {
                number: index + 1,
                entry: Entry::from_requirement(requirement, None),
            },
        );
        if was_empty {
            self.trailing_newline = true;
        }
        self.renumber();

        Ok(EditOutcome::Added { line: index + 1 })
    }

    /// Remove the first requirement for `name`, returning it
    pub fn remove(&mut self, name: &PackageName) -> ManifestResult<Requirement> {
        let index = self
            .find(name)
            .ok_or_else(|| ReqlintError::PackageNotFound {
                name: name.to_string(),
            })?;

        let line = self.lines.remove(index);
        self.renumber();
        debug!(package = %name, line = line.number, "Removed requirement");

        match line.entry {
            Entry::Requirement { requirement, .. } => Ok(requirement),
            _ => unreachable!("find only returns requirement lines"),
        }
    }

    /// Index just past the last requirement or invalid line
    ///
    /// Falls back to the end of content when the manifest has none.
    fn end_of_payload(&self) -> usize {
        self.lines
            .iter()
            .rposition(|line| line.entry.is_payload())
            .map_or_else(|| self.end_of_content(), |i| i + 1)
    }

    /// Index just past the last non-blank line
    fn end_of_content(&self) -> usize {
        self.lines
            .iter()
            .rposition(|line| !line.entry.is_blank())
            .map_or(0, |i| i + 1)
    }

    /// Write a `# label` header at the end and return the insert position below it
    fn append_group_header(&mut self, label: &str) -> usize {
        let mut index = self.end_of_content();

        if index > 0 {
            self.lines.insert(
                index,
                Line {
                    number: 0,
                    entry: Entry::Blank { raw: String::new() },
                },
            );
            index += 1;
        }

        self.lines.insert(
            index,
            Line {
                number: 0,
                entry: Entry::Comment {
                    raw: format!("# {}", label),
                },
            },
        );

        index + 1
    }
}
