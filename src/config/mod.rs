//! Binding positional arguments into a search configuration
//!
//! Tokens are positional: `path [pattern] [zipFile]`. Anything after the
//! third token is ignored. With no tokens at all the caller prints the usage
//! banner and exits successfully.

use crate::error::BindError;
use crate::matcher::{LineMatcher, MatchMode};
use std::path::{Path, PathBuf};

/// What a run should do, resolved from the positional tokens.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    root: PathBuf,
    pattern: Option<String>,
    archive_name: Option<PathBuf>,
    matcher: Option<LineMatcher>,
}

impl SearchConfig {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Output archive path. `None` means a selection-only dry run.
    pub fn archive_name(&self) -> Option<&Path> {
        self.archive_name.as_deref()
    }

    /// Compiled form of [`pattern`](Self::pattern); present iff the pattern is.
    pub fn matcher(&self) -> Option<&LineMatcher> {
        self.matcher.as_ref()
    }
}

/// Result of binding.
#[derive(Debug, Clone)]
pub enum Binding {
    /// No tokens were given; print [`usage`] and stop.
    Usage,
    Search(SearchConfig),
}

/// Bind up to three positional tokens. The pattern is compiled eagerly, so a
/// malformed pattern fails here rather than during the walk.
pub fn bind<S: AsRef<str>>(tokens: &[S], mode: MatchMode) -> Result<Binding, BindError> {
    let mut tokens = tokens.iter().map(|t| -> &str { t.as_ref() }).take(3);

    let Some(root) = tokens.next() else {
        return Ok(Binding::Usage);
    };
    let pattern = tokens.next().map(str::to_string);
    let archive_name = tokens.next().map(PathBuf::from);

    let matcher = match &pattern {
        Some(p) => Some(LineMatcher::new(p, mode)?),
        None => None,
    };

    Ok(Binding::Search(SearchConfig { root: PathBuf::from(root), pattern, archive_name, matcher }))
}

/// The usage banner for `program`.
pub fn usage(program: &str) -> String {
    format!("USAGE: {} path [pattern] [zipFile]", program)
}
