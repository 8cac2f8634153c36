//! Walk, match, and archive for a bound configuration

use anyhow::{Context, Result};

use crate::archive::write_archive;
use crate::config::SearchConfig;
use crate::scan::FileWalker;

pub fn run(cfg: &SearchConfig, follow_symlinks: bool) -> Result<()> {
    tracing::debug!(
        root = %cfg.root().display(),
        pattern = cfg.pattern().unwrap_or("<any>"),
        mode = ?cfg.matcher().map(|m| m.mode()),
        "Starting search"
    );

    let mut walker = FileWalker::new(cfg.root().to_path_buf()).follow_symlinks(follow_symlinks);
    if let Some(output) = cfg.archive_name() {
        walker = walker.exclude(output);
    }

    let (staged, stats) = walker
        .walk(cfg.matcher())
        .with_context(|| format!("Failed scanning {}", cfg.root().display()))?;

    tracing::info!(
        visited = stats.files_visited,
        matched = stats.files_matched,
        failed = stats.files_failed,
        skipped = stats.entries_skipped,
        "Scan complete"
    );

    let Some(output) = cfg.archive_name() else {
        tracing::debug!("No zip file given, {} matching files not archived", staged.len());
        return Ok(());
    };

    let written = write_archive(cfg.root(), &staged, output)
        .with_context(|| format!("Failed writing archive {}", output.display()))?;
    tracing::info!("Wrote {} entries to {}", written, output.display());

    Ok(())
}
