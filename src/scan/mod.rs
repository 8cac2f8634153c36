//! Tree traversal and staging of matching files

use std::path::PathBuf;

pub mod walker;

pub use walker::FileWalker;

/// Files accepted by the matcher, in traversal order.
///
/// Filled by the walker, then handed over whole to the archiver.
#[derive(Debug, Default, Clone)]
pub struct StagedSet {
    paths: Vec<PathBuf>,
}

impl StagedSet {
    pub fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl IntoIterator for StagedSet {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a StagedSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Counters collected during a walk.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    /// Regular files handed to the matcher.
    pub files_visited: usize,
    pub files_matched: usize,
    /// Files the matcher could not read or decode.
    pub files_failed: usize,
    /// Entries never handed to the matcher: traversal errors, symlinks,
    /// special files, a stale output archive.
    pub entries_skipped: usize,
}
