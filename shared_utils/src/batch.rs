//! Batch Processing Module
//!
//! File collection and per-run accounting for batch tools.
//! Collection is non-recursive: only files directly inside the directory
//! are considered, with symlinks followed. They come back in the order the
//! filesystem lists them unless a `SortStrategy` says otherwise.

use crate::file_sorter::{FileSorter, SortStrategy};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const JPEG_SUFFIXES: &[&str] = &[".jpg", ".jpeg"];

/// Collect regular files directly under `dir` whose name ends in one of
/// `suffixes` (case-insensitive).
///
/// Fails only when `dir` itself cannot be listed; unreadable individual
/// entries are logged and skipped.
pub fn collect_files(dir: &Path, suffixes: &[&str]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !is_candidate(&entry) {
            continue;
        }
        if crate::common_utils::has_name_suffix(entry.file_name(), suffixes) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Regular files, and symlinks that do not point at a directory. A dangling
/// link stays in the list so the caller reports it instead of losing it.
fn is_candidate(entry: &walkdir::DirEntry) -> bool {
    if entry.path_is_symlink() {
        !entry.path().is_dir()
    } else {
        entry.file_type().is_file()
    }
}

pub fn collect_files_sorted(
    dir: &Path,
    suffixes: &[&str],
    sort_strategy: SortStrategy,
) -> io::Result<Vec<PathBuf>> {
    let files = collect_files(dir, suffixes)?;
    Ok(FileSorter::new(sort_strategy).sort(files))
}

/// Counters for one batch run. `total` is fixed up front; the other
/// counters only ever grow.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub cancelled: bool,
    pub errors: Vec<(PathBuf, String)>,
}

impl BatchResult {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn success(&mut self, input_bytes: u64, output_bytes: u64) {
        self.succeeded += 1;
        self.input_bytes += input_bytes;
        self.output_bytes += output_bytes;
    }

    pub fn fail(&mut self, path: PathBuf, error: String) {
        self.failed += 1;
        self.errors.push((path, error));
    }

    /// Mark the run as cancelled; every file not yet attempted is skipped.
    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.skipped = self.total - self.attempted();
    }

    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }

    /// `(processed_count, total_count)`
    pub fn counts(&self) -> (usize, usize) {
        (self.succeeded, self.total)
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.succeeded as f64 / self.total as f64) * 100.0
        }
    }
}
