//! Path normalization and archive entry naming

use crate::error::ArchiveError;
use std::path::{Component, Path, PathBuf};

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Resolve `path` against the current directory without touching symlinks.
pub fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Archive entry name for `file` relative to `root`.
///
/// Both paths are absolutized and `root` is stripped component-wise, so
/// `./x` and `x/.` compare equal. The remainder uses `/` separators and never
/// starts with one. A root that is itself the file yields the file name.
pub fn entry_name(root: &Path, file: &Path) -> Result<String, ArchiveError> {
    let outside = || ArchiveError::OutsideRoot {
        path: file.to_path_buf(),
        root: root.to_path_buf(),
    };

    let abs_root = absolutize(root).map_err(|_| outside())?;
    let abs_file = absolutize(file).map_err(|_| outside())?;
    let rel = abs_file.strip_prefix(&abs_root).map_err(|_| outside())?;

    let joined = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let name = normalize_path(&joined).trim_start_matches('/').to_string();
    if name.is_empty() {
        return abs_file
            .file_name()
            .map(|n| normalize_path(&n.to_string_lossy()))
            .ok_or_else(outside);
    }
    Ok(name)
}
