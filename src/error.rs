//! Error types for the search-and-zip pipeline
//!
//! Matching and archiving fail differently: a file that cannot be read while
//! matching is logged and skipped, while a file that cannot be archived ends
//! the run. Each phase gets its own error type so callers cannot mix them up.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while binding command-line tokens into a [`SearchConfig`].
///
/// [`SearchConfig`]: crate::config::SearchConfig
#[derive(Error, Debug)]
pub enum BindError {
    #[error("invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure reading a single file during matching. Never fatal.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("failed to open: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("contents are not valid UTF-8")]
    Decode { path: PathBuf },
}

impl FileError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } | Self::Decode { path } => path,
        }
    }
}

/// Failure while traversing the tree.
#[derive(Error, Debug)]
pub enum WalkError {
    /// The root itself cannot be visited. Fatal.
    #[error("cannot access root '{}': {source}", path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descendant could not be visited (permission denied, symlink loop).
    /// Logged and skipped.
    #[error("{message}")]
    Entry { path: Option<PathBuf>, message: String },
}

/// Failure while writing the output archive. Always fatal.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("cannot create archive '{}': {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read staged file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write entry '{name}': {source}")]
    Write {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("cannot copy '{}' into entry '{name}': {source}", path.display())]
    Copy {
        path: PathBuf,
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot finalize archive '{}': {source}", path.display())]
    Finish {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("'{}' is not under root '{}'", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}
