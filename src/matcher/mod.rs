//! Per-file content matching
//!
//! A file matches when at least one of its lines is matched by the pattern.
//! By default the pattern has to cover the whole line, so `foo` only matches
//! a line that is exactly `foo`; use `.*foo.*` or [`MatchMode::Substring`]
//! for containment.

use crate::error::{BindError, FileError};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// How a compiled pattern is applied to each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// The pattern must match the entire line.
    #[default]
    WholeLine,
    /// The pattern may match anywhere in the line.
    Substring,
}

/// Decides whether a file's contents match the configured pattern.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    regex: Regex,
    mode: MatchMode,
}

impl LineMatcher {
    /// Compile `pattern` for the given mode.
    ///
    /// The raw pattern is validated on its own before it is anchored, so a
    /// source such as `a)|(b` is rejected even though wrapping it would
    /// balance the parentheses.
    pub fn new(pattern: &str, mode: MatchMode) -> Result<Self, BindError> {
        let compile = |src: &str| {
            Regex::new(src)
                .map_err(|source| BindError::Pattern { pattern: pattern.to_string(), source })
        };

        let raw = compile(pattern)?;
        let regex = match mode {
            MatchMode::WholeLine => compile(&format!(r"\A(?:{})\z", pattern))?,
            MatchMode::Substring => raw,
        };

        Ok(Self { regex, mode })
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Test a single line (without its terminator).
    pub fn matches_line(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Scan `path` line by line, stopping at the first matching line.
    ///
    /// A line ends at `\n`, `\r\n` or a lone `\r`. Each line is decoded as
    /// UTF-8 on its own; an invalid one yields [`FileError::Decode`].
    pub fn matches_file(&self, path: &Path) -> Result<bool, FileError> {
        let file = File::open(path)
            .map_err(|source| FileError::Open { path: path.to_path_buf(), source })?;
        let mut reader = BufReader::new(file);
        let mut chunk = Vec::new();

        loop {
            chunk.clear();
            let read = reader
                .read_until(b'\n', &mut chunk)
                .map_err(|source| FileError::Read { path: path.to_path_buf(), source })?;
            if read == 0 {
                return Ok(false);
            }

            for line in split_lines(&chunk) {
                let line = std::str::from_utf8(line)
                    .map_err(|_| FileError::Decode { path: path.to_path_buf() })?;
                if self.matches_line(line) {
                    return Ok(true);
                }
            }
        }
    }
}

/// Split a chunk ending in at most one `\n` into lines, treating `\r\n` and
/// a lone `\r` as terminators too.
fn split_lines(chunk: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    let body = chunk.strip_suffix(b"\n").unwrap_or(chunk);
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    body.split(|&b| b == b'\r')
}

/// Matcher entry point: no matcher means every file matches, and the file is
/// not opened at all.
pub fn file_matches(matcher: Option<&LineMatcher>, path: &Path) -> Result<bool, FileError> {
    match matcher {
        Some(m) => m.matches_file(path),
        None => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_whole_line_requires_full_match() {
        let m = LineMatcher::new("foo", MatchMode::WholeLine).unwrap();
        assert!(m.matches_line("foo"));
        assert!(!m.matches_line("foobar"));
        assert!(!m.matches_line(" foo"));

        let m = LineMatcher::new(".*foo.*", MatchMode::WholeLine).unwrap();
        assert!(m.matches_line("a foo b"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_group() {
        let m = LineMatcher::new("foo|bar", MatchMode::WholeLine).unwrap();
        assert!(m.matches_line("bar"));
        assert!(!m.matches_line("foox"));
        assert!(!m.matches_line("xbar"));
    }

    #[test]
    fn test_substring_mode() {
        let m = LineMatcher::new("foo", MatchMode::Substring).unwrap();
        assert!(m.matches_line("xx foo yy"));
        assert_eq!(m.mode(), MatchMode::Substring);
    }

    #[test]
    fn test_invalid_pattern_rejected_before_anchoring() {
        assert!(LineMatcher::new("a)|(b", MatchMode::WholeLine).is_err());
        assert!(LineMatcher::new("(unclosed", MatchMode::WholeLine).is_err());

        let err = LineMatcher::new("[z-a]", MatchMode::Substring).unwrap_err();
        assert!(err.to_string().contains("[z-a]"));
    }

    #[test]
    fn test_matches_file_scans_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("match.txt");
        fs::write(&path, "foo\r\nbar\n").unwrap();

        let m = LineMatcher::new("bar", MatchMode::WholeLine).unwrap();
        assert!(m.matches_file(&path).unwrap());

        // CRLF terminators are stripped
        let m = LineMatcher::new("foo", MatchMode::WholeLine).unwrap();
        assert!(m.matches_file(&path).unwrap());

        let m = LineMatcher::new("baz", MatchMode::WholeLine).unwrap();
        assert!(!m.matches_file(&path).unwrap());
    }

    #[test]
    fn test_lone_carriage_return_ends_a_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mac.txt");
        fs::write(&path, "foo\rbar\r").unwrap();

        let m = LineMatcher::new("foo", MatchMode::WholeLine).unwrap();
        assert!(m.matches_file(&path).unwrap());

        let m = LineMatcher::new("bar", MatchMode::WholeLine).unwrap();
        assert!(m.matches_file(&path).unwrap());

        let m = LineMatcher::new("foo.bar", MatchMode::WholeLine).unwrap();
        assert!(!m.matches_file(&path).unwrap());
    }

    #[test]
    fn test_split_lines_terminators() {
        fn lines(chunk: &[u8]) -> Vec<Vec<u8>> {
            split_lines(chunk).map(|l| l.to_vec()).collect()
        }

        assert_eq!(lines(b"abc\n"), vec![b"abc".to_vec()]);
        assert_eq!(lines(b"abc\r\n"), vec![b"abc".to_vec()]);
        assert_eq!(lines(b"abc"), vec![b"abc".to_vec()]);
        assert_eq!(lines(b"\n"), vec![Vec::new()]);
        assert_eq!(lines(b"a\r\rb"), vec![b"a".to_vec(), Vec::new(), b"b".to_vec()]);
        assert_eq!(lines(b"a\rb\r"), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn test_empty_file_never_matches_a_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.txt");
        fs::write(&path, "").unwrap();

        let m = LineMatcher::new(".*", MatchMode::WholeLine).unwrap();
        assert!(!m.matches_file(&path).unwrap());
    }

    #[test]
    fn test_invalid_utf8_is_decode_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("latin1.txt");
        fs::write(&path, [0x63, 0x61, 0x66, 0xe9, b'\n']).unwrap();

        let m = LineMatcher::new(".*", MatchMode::WholeLine).unwrap();
        let err = m.matches_file(&path).unwrap_err();
        assert!(matches!(err, FileError::Decode { .. }));
    }

    #[test]
    fn test_short_circuits_before_invalid_tail() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mixed.txt");
        let mut bytes = b"hit\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        fs::write(&path, bytes).unwrap();

        let m = LineMatcher::new("hit", MatchMode::WholeLine).unwrap();
        assert!(m.matches_file(&path).unwrap());
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");

        let m = LineMatcher::new(".*", MatchMode::WholeLine).unwrap();
        assert!(matches!(m.matches_file(&path), Err(FileError::Open { .. })));
    }

    #[test]
    fn test_no_matcher_matches_without_opening() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.txt");
        assert!(file_matches(None, &path).unwrap());
    }
}
