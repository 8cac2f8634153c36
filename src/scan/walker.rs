//! Directory walker that feeds regular files to the matcher

use super::{StagedSet, WalkStats};
use crate::error::WalkError;
use crate::matcher::{file_matches, LineMatcher};
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Walks a tree in file-name order and stages every file the matcher accepts.
///
/// Per-file failures are printed and skipped. Only a root that cannot be
/// visited stops the walk.
pub struct FileWalker {
    root: PathBuf,
    follow_symlinks: bool,
    exclude: Option<PathBuf>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self { root, follow_symlinks: false, exclude: None }
    }

    /// Set whether to follow symbolic links
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Skip the file at `path` if it already exists when the walk starts.
    /// Used to keep a previous output archive out of its own successor.
    pub fn exclude(mut self, path: &Path) -> Self {
        self.exclude = fs::canonicalize(path).ok();
        self
    }

    fn check_root(&self) -> Result<(), WalkError> {
        let root_err = |source: io::Error| WalkError::Root { path: self.root.clone(), source };

        let metadata = fs::metadata(&self.root).map_err(root_err)?;
        if metadata.is_dir() {
            fs::read_dir(&self.root).map_err(root_err)?;
        }
        Ok(())
    }

    fn is_excluded(&self, path: &Path) -> bool {
        match &self.exclude {
            Some(excluded) => fs::canonicalize(path).map(|p| &p == excluded).unwrap_or(false),
            None => false,
        }
    }

    /// Walk the tree, printing `processFile:` for every regular file and
    /// `addFileToZip:` for every file that matches.
    pub fn walk(&self, matcher: Option<&LineMatcher>) -> Result<(StagedSet, WalkStats), WalkError> {
        self.check_root()?;

        let mut staged = StagedSet::default();
        let mut stats = WalkStats::default();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name(|a, b| a.cmp(b));

        for entry_result in builder.build() {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let err = entry_error(err);
                    report_failure(err_path(&err), &err);
                    stats.entries_skipped += 1;
                    continue;
                }
            };

            let path = entry.path();
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                tracing::debug!("Skipping non-regular entry: {}", path.display());
                stats.entries_skipped += 1;
                continue;
            }
            if self.is_excluded(path) {
                tracing::warn!("Skipping output archive found inside root: {}", path.display());
                stats.entries_skipped += 1;
                continue;
            }

            println!("processFile: {}", path.display());
            stats.files_visited += 1;

            match file_matches(matcher, path) {
                Ok(true) => {
                    println!("addFileToZip: {}", path.display());
                    stats.files_matched += 1;
                    staged.push(path.to_path_buf());
                }
                Ok(false) => {}
                Err(e) => {
                    report_failure(Some(e.path()), &e);
                    stats.files_failed += 1;
                }
            }
        }

        Ok((staged, stats))
    }
}

fn report_failure(path: Option<&Path>, err: &dyn std::fmt::Display) {
    match path {
        Some(p) => eprintln!("Error processing file: {} : {}", p.display(), err),
        None => eprintln!("Error processing file: <unknown> : {}", err),
    }
}

fn err_path(err: &WalkError) -> Option<&Path> {
    match err {
        WalkError::Entry { path, .. } => path.as_deref(),
        WalkError::Root { path, .. } => Some(path),
    }
}

/// Flatten an `ignore` error into the path it concerns plus a message.
fn entry_error(err: ignore::Error) -> WalkError {
    fn find_path(err: &ignore::Error) -> Option<PathBuf> {
        match err {
            ignore::Error::WithPath { path, .. } => Some(path.clone()),
            ignore::Error::WithDepth { err, .. } => find_path(err),
            ignore::Error::WithLineNumber { err, .. } => find_path(err),
            ignore::Error::Loop { child, .. } => Some(child.clone()),
            _ => None,
        }
    }

    fn innermost(err: &ignore::Error) -> String {
        match err {
            ignore::Error::WithPath { err, .. }
            | ignore::Error::WithDepth { err, .. }
            | ignore::Error::WithLineNumber { err, .. } => innermost(err),
            other => other.to_string(),
        }
    }

    WalkError::Entry { path: find_path(&err), message: innermost(&err) }
}
