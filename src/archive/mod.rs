//! Zip output for staged files
//!
//! Entries are named relative to the scan root, carry the source file's
//! modification time, and hold the file bytes unchanged, streamed from
//! disk. Any failure here ends the run: a staged file that cannot be
//! archived is an error, not a skip.

use crate::error::ArchiveError;
use crate::scan::StagedSet;
use crate::utils::entry_name;
use chrono::{Datelike, Local, Timelike};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

// DOS timestamps cover 1980..=2107
const DOS_MIN_YEAR: i32 = 1980;
const DOS_MAX_YEAR: i32 = 2107;

/// One staged file, named and stamped. The payload is streamed from
/// `source` when the entry is written.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub mod_time: SystemTime,
    pub source: PathBuf,
}

impl ArchiveEntry {
    /// Name `file` relative to `root` and read its modification time.
    pub fn load(root: &Path, file: &Path) -> Result<Self, ArchiveError> {
        let name = entry_name(root, file)?;
        let mod_time = fs::metadata(file)
            .and_then(|m| m.modified())
            .map_err(|source| ArchiveError::Read { path: file.to_path_buf(), source })?;

        Ok(Self { name, mod_time, source: file.to_path_buf() })
    }
}

/// Convert a timestamp to the local-time DOS form zip stores.
pub fn to_zip_time(time: SystemTime) -> zip::DateTime {
    let local: chrono::DateTime<Local> = time.into();

    if local.year() < DOS_MIN_YEAR {
        tracing::warn!("Timestamp {} predates 1980, clamping", local);
        return zip::DateTime::default();
    }
    if local.year() > DOS_MAX_YEAR {
        tracing::warn!("Timestamp {} is past 2107, clamping", local);
        return zip::DateTime::from_date_and_time(2107, 12, 31, 23, 59, 58)
            .unwrap_or_default();
    }

    zip::DateTime::from_date_and_time(
        local.year() as u16,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        // leap seconds surface as 60 and are out of range for DOS time
        local.second().min(59) as u8,
    )
    .unwrap_or_default()
}

/// Writes entries to a deflate zip file.
///
/// Dropping the archiver without calling [`finish`](Self::finish) still
/// closes the output stream.
pub struct ZipArchiver {
    path: PathBuf,
    writer: ZipWriter<BufWriter<File>>,
    entries_written: usize,
}

impl ZipArchiver {
    pub fn create(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::create(path)
            .map_err(|source| ArchiveError::Create { path: path.to_path_buf(), source })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: ZipWriter::new(BufWriter::new(file)),
            entries_written: 0,
        })
    }

    /// Start an entry and copy the source file into it.
    pub fn add_entry(&mut self, entry: &ArchiveEntry) -> Result<(), ArchiveError> {
        let mut source = File::open(&entry.source)
            .map_err(|source| ArchiveError::Read { path: entry.source.clone(), source })?;

        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(to_zip_time(entry.mod_time));

        self.writer
            .start_file(entry.name.as_str(), options)
            .map_err(|source| ArchiveError::Write { name: entry.name.clone(), source })?;
        io::copy(&mut source, &mut self.writer).map_err(|source| ArchiveError::Copy {
            path: entry.source.clone(),
            name: entry.name.clone(),
            source,
        })?;

        self.entries_written += 1;
        Ok(())
    }

    /// Stat `file` and append it.
    pub fn add_file(&mut self, root: &Path, file: &Path) -> Result<(), ArchiveError> {
        let entry = ArchiveEntry::load(root, file)?;
        tracing::debug!("Archiving {} as {}", file.display(), entry.name);
        self.add_entry(&entry)
    }

    /// Write the central directory and flush. Returns the entry count.
    pub fn finish(mut self) -> Result<usize, ArchiveError> {
        let finish_err =
            |path: &Path, source| ArchiveError::Finish { path: path.to_path_buf(), source };

        let mut inner = self.writer.finish().map_err(|e| finish_err(&self.path, e))?;
        inner.flush().map_err(|e| finish_err(&self.path, ZipError::Io(e)))?;
        Ok(self.entries_written)
    }
}

/// Archive every staged file, in staging order, into `output`.
pub fn write_archive(
    root: &Path,
    staged: &StagedSet,
    output: &Path,
) -> Result<usize, ArchiveError> {
    let mut archiver = ZipArchiver::create(output)?;
    for file in staged {
        archiver.add_file(root, file)?;
    }
    archiver.finish()
}
