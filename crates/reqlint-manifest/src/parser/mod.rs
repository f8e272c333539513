//! Manifest parsing and file IO

use camino::Utf8Path;
use reqlint_core::error::ReqlintError;
use reqlint_core::types::Requirement;
use tracing::debug;

use crate::document::{Entry, Line, Manifest};
use crate::ManifestResult;

/// Parse manifest text, keeping unparseable lines as `Entry::Invalid`
pub fn parse_manifest(content: &str) -> Manifest {
    let trailing_newline = content.ends_with('\n');

    let mut raw_lines: Vec<&str> = content.split('\n').collect();
    if trailing_newline || content.is_empty() {
        raw_lines.pop();
    }

    let lines: Vec<Line> = raw_lines
        .into_iter()
        .enumerate()
        .map(|(index, raw)| Line {
            number: index + 1,
            entry: parse_line(raw.strip_suffix('\r').unwrap_or(raw)),
        })
        .collect();

    debug!(
        lines = lines.len(),
        invalid = lines.iter().filter(|l| matches!(l.entry, Entry::Invalid { .. })).count(),
        "Parsed manifest"
    );

    Manifest {
        lines,
        trailing_newline,
    }
}

/// Parse manifest text, failing on the first invalid line
pub fn parse_manifest_strict(content: &str) -> ManifestResult<Manifest> {
    let manifest = parse_manifest(content);

    if let Some((line, error)) = manifest.invalid_lines().next() {
        return Err(ReqlintError::ManifestParse {
            message: error.to_string(),
            line: line.number,
            column: error.column(),
        });
    }

    Ok(manifest)
}

/// Classify a single line
pub fn parse_line(raw: &str) -> Entry {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Entry::Blank {
            raw: raw.to_string(),
        };
    }

    if trimmed.starts_with('#') {
        return Entry::Comment {
            raw: raw.to_string(),
        };
    }

    let (body, inline_comment) = split_inline_comment(raw);

    match Requirement::parse(body) {
        Ok(requirement) => Entry::Requirement {
            raw: raw.to_string(),
            requirement,
            inline_comment,
        },
        Err(error) => Entry::Invalid {
            raw: raw.to_string(),
            error,
        },
    }
}

/// Split `pkg==1.0  # note` into the requirement and the comment text
///
/// A `#` only starts a comment when preceded by whitespace.
fn split_inline_comment(raw: &str) -> (&str, Option<String>) {
    let mut previous_was_space = false;

    for (index, ch) in raw.char_indices() {
        if ch == '#' && previous_was_space {
            let comment = raw[index + 1..].trim().to_string();
            return (&raw[..index], Some(comment));
        }
        previous_was_space = ch.is_whitespace();
    }

    (raw, None)
}

/// Load and parse a manifest from a file path
pub async fn load_from_file(path: &Utf8Path) -> ManifestResult<Manifest> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ReqlintError::io(format!("Failed to read {}", path), e))?;

    debug!(path = %path, bytes = content.len(), "Loaded manifest");
    Ok(parse_manifest(&content))
}

/// Write manifest text to a file path
pub async fn save_to_file(path: &Utf8Path, content: &str) -> ManifestResult<()> {
    tokio::fs::write(path, content)
        .await
        .map_err(|e| ReqlintError::io(format!("Failed to write {}", path), e))?;

    debug!(path = %path, bytes = content.len(), "Saved manifest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqlint_core::types::{RequirementErrorKind, VersionSpec};

    #[test]
    fn test_parse_line_kinds() {
        assert!(parse_line("").is_blank());
        assert!(parse_line("   \t").is_blank());
        assert!(matches!(parse_line("# Web scraping"), Entry::Comment { .. }));
        assert!(matches!(parse_line("   # indented"), Entry::Comment { .. }));

        let entry = parse_line("beautifulsoup4==4.12.3");
        let req = entry.requirement().unwrap();
        assert_eq!(req.name.as_str(), "beautifulsoup4");
        assert!(matches!(req.spec, VersionSpec::Exact(_)));

        assert!(matches!(parse_line("pkg<=1.0"), Entry::Invalid { .. }));
    }

    #[test]
    fn test_inline_comments() {
        match parse_line("lxml>=5.0  # needed by python-docx") {
            Entry::Requirement {
                requirement,
                inline_comment,
                ..
            } => {
                assert_eq!(requirement.name.as_str(), "lxml");
                assert_eq!(inline_comment.as_deref(), Some("needed by python-docx"));
            },
            other => panic!("expected requirement, got {:?}", other),
        }

        // '#' glued to the requirement is not a comment
        match parse_line("pkg#frag") {
            Entry::Invalid { error, .. } => {
                assert!(matches!(error.kind, RequirementErrorKind::UnexpectedText { .. }));
            },
            other => panic!("expected invalid line, got {:?}", other),
        }
    }

    #[test]
    fn test_line_numbers_and_newlines() {
        let manifest = parse_manifest("a\r\n\r\n# c\r\nb==1.0");
        assert_eq!(manifest.lines.len(), 4);
        assert_eq!(manifest.lines[3].number, 4);
        assert!(!manifest.trailing_newline);
        assert!(manifest.lines[1].entry.is_blank());

        let empty = parse_manifest("");
        assert!(empty.lines.is_empty());
        assert_eq!(empty.render(), "");
    }

    #[test]
    fn test_strict_reports_first_error() {
        let err = parse_manifest_strict("pandas\nnumpy==1.26\nscipy ~= 1.11\nbad==x\n").unwrap_err();
        match err {
            ReqlintError::ManifestParse { line, column, message } => {
                assert_eq!(line, 3);
                assert_eq!(column, 7);
                assert!(message.contains("~="));
            },
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(parse_manifest_strict("pandas\n# ok\n").is_ok());
    }

    #[tokio::test]
    async fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("requirements.txt")).unwrap();

        save_to_file(&path, "requests==2.31.0\n").await.unwrap();
        let manifest = load_from_file(&path).await.unwrap();
        assert_eq!(manifest.len(), 1);

        let missing = path.with_file_name("missing.txt");
        let err = load_from_file(&missing).await.unwrap_err();
        assert!(matches!(err, ReqlintError::Io { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("nope/requirements.txt")).unwrap();

        let err = tokio_test::block_on(save_to_file(&path, "a\n")).unwrap_err();
        assert_eq!(err.exit_code(), 74);
    }
}
