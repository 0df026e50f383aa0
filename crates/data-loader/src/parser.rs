//! Parser for tag vocabulary artifacts.
//!
//! Two formats are accepted:
//! - `*.json`: an object mapping token -> id, as written out by the tokenizer
//!   the model was trained with
//! - anything else: one `token id` pair per line, blank lines ignored

use crate::error::{DataLoadError, Result};
use crate::types::TokenId;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Parse a vocabulary artifact into `(token, id)` pairs.
///
/// Entries are returned sorted by id so that downstream error reporting is
/// stable regardless of the JSON object's key order.
pub fn parse_vocabulary(path: &Path) -> Result<Vec<(String, TokenId)>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path)?;
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut entries = if is_json {
        parse_json_index(&content)?
    } else {
        parse_token_lines(&content, &file)?
    };
    entries.sort_by_key(|(_, id)| *id);
    Ok(entries)
}

/// Parse a `{"token": id, ...}` object
fn parse_json_index(content: &str) -> Result<Vec<(String, TokenId)>> {
    let index: HashMap<String, TokenId> = serde_json::from_str(content)?;
    Ok(index.into_iter().collect())
}

/// Parse `token id` lines
fn parse_token_lines(content: &str, file: &str) -> Result<Vec<(String, TokenId)>> {
    let mut entries = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let mut parts = line_trimmed.split_whitespace();
        let token = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: "Missing token".to_string(),
        })?;
        let id = parts.next().ok_or_else(|| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Missing id for token {}", token),
        })?;
        if parts.next().is_some() {
            return Err(DataLoadError::ParseError {
                file: file.to_string(),
                line: line_no,
                reason: "Expected exactly two fields".to_string(),
            });
        }

        let id = id.parse().map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: format!("Invalid id: {}", e),
        })?;
        entries.push((token.to_string(), id));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_lines() {
        let entries = parse_token_lines("dp1800 1\n\n  greedy800 2  \n", "vocab.txt").unwrap();
        assert_eq!(
            entries,
            vec![("dp1800".to_string(), 1), ("greedy800".to_string(), 2)]
        );
    }

    #[test]
    fn test_parse_token_lines_reports_line_number() {
        let err = parse_token_lines("dp1800 1\nmath1200\n", "vocab.txt").unwrap_err();
        match err {
            DataLoadError::ParseError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_token_lines("dp1800 one\n", "vocab.txt").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parse_json_index() {
        let mut entries = parse_json_index(r#"{"math1200": 2, "dp1800": 1}"#).unwrap();
        entries.sort_by_key(|(_, id)| *id);
        assert_eq!(entries[0], ("dp1800".to_string(), 1));
        assert_eq!(entries[1], ("math1200".to_string(), 2));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_vocabulary(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }
}
