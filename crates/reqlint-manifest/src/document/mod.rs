//! Manifest document model
//!
//! A `Manifest` is the ordered list of lines in a manifest file. Each line
//! keeps its original text, so rendering an unedited manifest gives back the
//! input apart from line endings.

use reqlint_core::types::{PackageName, Requirement, RequirementError};

/// One line of a manifest
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// 1-based line number
    pub number: usize,
    pub entry: Entry,
}

/// Parsed content of a line
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Empty or whitespace-only line
    Blank { raw: String },

    /// Line starting with `#`
    Comment { raw: String },

    /// Valid requirement, with an optional trailing `# comment`
    Requirement {
        raw: String,
        requirement: Requirement,
        inline_comment: Option<String>,
    },

    /// Line that is neither blank, comment nor a valid requirement
    Invalid { raw: String, error: RequirementError },
}

/// Requirements introduced by a comment block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Cleaned-up text of the header comment; `None` for the leading group
    pub label: Option<String>,
    /// Line indices of the header comment block
    pub header: Vec<usize>,
    /// Line indices of requirement and invalid lines in the group
    pub members: Vec<usize>,
}

/// Parsed manifest
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Manifest {
    pub lines: Vec<Line>,
    /// Whether the source ended with a newline
    pub trailing_newline: bool,
}

impl Entry {
    /// Original text of the line
    pub fn raw(&self) -> &str {
        match self {
            Entry::Blank { raw }
            | Entry::Comment { raw }
            | Entry::Requirement { raw, .. }
            | Entry::Invalid { raw, .. } => raw,
        }
    }

    /// Requirement on this line, if valid
    pub fn requirement(&self) -> Option<&Requirement> {
        match self {
            Entry::Requirement { requirement, .. } => Some(requirement),
            _ => None,
        }
    }

    /// Comment text without the leading `#`
    pub fn comment_text(&self) -> Option<&str> {
        match self {
            Entry::Comment { raw } => Some(raw.trim_start().trim_start_matches('#').trim()),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Entry::Blank { .. })
    }

    /// Requirement or invalid line
    pub fn is_payload(&self) -> bool {
        matches!(self, Entry::Requirement { .. } | Entry::Invalid { .. })
    }

    /// Build a requirement entry rendered in canonical form
    pub fn from_requirement(requirement: Requirement, inline_comment: Option<String>) -> Self {
        let raw = render_requirement_line(&requirement.render(false), inline_comment.as_deref());
        Entry::Requirement {
            raw,
            requirement,
            inline_comment,
        }
    }
}

/// Join a requirement and its inline comment the way the formatter writes them
pub fn render_requirement_line(requirement: &str, inline_comment: Option<&str>) -> String {
    match inline_comment {
        Some("") => format!("{}  #", requirement),
        Some(comment) => format!("{}  # {}", requirement, comment),
        None => requirement.to_string(),
    }
}

/// Strip `#`, whitespace and divider characters from a header comment
pub fn clean_label(comment: &str) -> Option<String> {
    let label = comment
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '#' | '=' | '-' | '*'))
        .to_string();

    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

impl Manifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requirement lines
    pub fn len(&self) -> usize {
        self.requirements().count()
    }

    /// Check if the manifest has no requirements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All valid requirements with their lines, in file order
    pub fn requirements(&self) -> impl Iterator<Item = (&Line, &Requirement)> {
        self.lines
            .iter()
            .filter_map(|line| line.entry.requirement().map(|req| (line, req)))
    }

    /// Lines that failed to parse
    pub fn invalid_lines(&self) -> impl Iterator<Item = (&Line, &RequirementError)> {
        self.lines.iter().filter_map(|line| match &line.entry {
            Entry::Invalid { error, .. } => Some((line, error)),
            _ => None,
        })
    }

    /// Index of the first line requiring `name`
    pub fn find(&self, name: &PackageName) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.entry.requirement().is_some_and(|req| &req.name == name))
    }

    /// Split the manifest into groups
    ///
    /// A run of comment lines whose next non-blank line is a requirement (or
    /// an invalid line) opens a group. Requirements before any such block
    /// form the unnamed leading group, which is omitted when empty.
    pub fn groups(&self) -> Vec<Group> {
        let mut groups = vec![Group::default()];
        let mut block: Vec<usize> = Vec::new();
        let mut block_closed = false;

        for (index, line) in self.lines.iter().enumerate() {
            match &line.entry {
                Entry::Comment { .. } => {
                    if block_closed {
                        block.clear();
                        block_closed = false;
                    }
                    block.push(index);
                },
                Entry::Blank { .. } => {
                    block_closed = true;
                },
                Entry::Requirement { .. } | Entry::Invalid { .. } => {
                    if block.is_empty() {
                        if let Some(current) = groups.last_mut() {
                            current.members.push(index);
                        }
                    } else {
                        let label = block
                            .iter()
                            .filter_map(|&i| self.lines[i].entry.comment_text())
                            .find_map(clean_label);
                        groups.push(Group {
                            label,
                            header: std::mem::take(&mut block),
                            members: vec![index],
                        });
                    }
                    block_closed = false;
                },
            }
        }

        if groups[0].members.is_empty() {
            groups.remove(0);
        }

        groups
    }

    /// Find a group by label, ignoring ASCII case and header decoration
    pub fn group(&self, label: &str) -> Option<Group> {
        let wanted = clean_label(label)?;
        self.groups().into_iter().find(|group| {
            group
                .label
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(&wanted))
        })
    }

    /// Reassign line numbers after an edit
    pub fn renumber(&mut self) {
        for (index, line) in self.lines.iter_mut().enumerate() {
            line.number = index + 1;
        }
    }

    /// Render the manifest back to text
    pub fn render(&self) -> String {
        let mut out = self
            .lines
            .iter()
            .map(|line| line.entry.raw())
            .collect::<Vec<_>>()
            .join("\n");

        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }

        out
    }
}
