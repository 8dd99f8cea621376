//! Folder enumeration with wildcard file matching
//!
//! Matching supports `*` (zero or more characters) and `?` (zero or one
//! character); everything else is literal. No regular expressions.
//! Case sensitivity follows the platform: insensitive on Windows,
//! sensitive elsewhere.

use crate::error::AcquisitionError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Enumerate files under `dir` whose names match `pattern`.
///
/// Order is the traversal order of the underlying directory walk; callers
/// must not assume sorting. Unreadable entries are skipped.
pub fn enumerate_files(
    dir: &Path,
    pattern: &str,
    recurse: bool,
) -> Result<Vec<PathBuf>, AcquisitionError> {
    if !dir.is_dir() {
        return Err(AcquisitionError::FolderNotFound {
            path: dir.display().to_string(),
        });
    }

    let max_depth = if recurse { usize::MAX } else { 1 };
    let mut matched = Vec::new();

    for entry in WalkDir::new(dir).max_depth(max_depth) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if wildcard_match(pattern, &name) {
            matched.push(entry.into_path());
        }
    }

    Ok(matched)
}

/// Match a file name against a wildcard pattern.
///
/// `*` matches zero or more characters, `?` matches zero or one.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let (pattern, name) = if cfg!(windows) {
        (pattern.to_lowercase(), name.to_lowercase())
    } else {
        (pattern.to_string(), name.to_string())
    };
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    match_chars(&pattern, &name)
}

fn match_chars(pattern: &[char], name: &[char]) -> bool {
    match pattern.first() {
        None => name.is_empty(),
        Some('*') => {
            match_chars(&pattern[1..], name)
                || (!name.is_empty() && match_chars(pattern, &name[1..]))
        }
        Some('?') => {
            match_chars(&pattern[1..], name)
                || (!name.is_empty() && match_chars(&pattern[1..], &name[1..]))
        }
        Some(&c) => {
            name.first() == Some(&c) && match_chars(&pattern[1..], &name[1..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_matches_zero_or_more() {
        assert!(wildcard_match("*", "anything.pem"));
        assert!(wildcard_match("*.pem", "a.pem"));
        assert!(wildcard_match("*.pem", ".pem"));
        assert!(!wildcard_match("*.pem", "a.der"));
        assert!(wildcard_match("s*", "server.crt"));
        assert!(!wildcard_match("s*", "cert.crt"));
    }

    #[test]
    fn question_mark_matches_zero_or_one() {
        assert!(wildcard_match("a?.pem", "a.pem"));
        assert!(wildcard_match("a?.pem", "ab.pem"));
        assert!(!wildcard_match("a?.pem", "abc.pem"));
    }

    #[test]
    fn literals_must_match_exactly() {
        assert!(wildcard_match("cert.der", "cert.der"));
        assert!(!wildcard_match("cert.der", "cert.pem"));
        #[cfg(not(windows))]
        assert!(!wildcard_match("*.pem", "c.PEM"));
        #[cfg(windows)]
        assert!(wildcard_match("*.pem", "c.PEM"));
    }

    #[test]
    fn empty_pattern_matches_only_empty_name() {
        assert!(wildcard_match("", ""));
        assert!(!wildcard_match("", "a"));
    }
}
