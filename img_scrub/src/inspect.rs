//! Metadata audit
//!
//! Reports which JPEGs in a folder still carry EXIF, XMP, ICC, IPTC or
//! comment segments. Read-only.

use crate::error::{Result, ScrubError};
use serde::Serialize;
use shared_utils::{collect_files_sorted, metadata_segments, JpegSegment, SortStrategy, JPEG_SUFFIXES};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub file: PathBuf,
    /// Metadata segments found before the first scan
    pub segments: Vec<JpegSegment>,
    /// Set when the file could not be read or its header is malformed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InspectReport {
    pub fn has_metadata(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Segment kinds joined for display, e.g. `EXIF, XMP, COM`.
    pub fn kinds_label(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.kind.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn inspect_file(path: &Path) -> InspectReport {
    let scanned = fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|data| metadata_segments(&data).map_err(|e| e.to_string()));

    match scanned {
        Ok(segments) => {
            debug!(file = %path.display(), count = segments.len(), "Scanned header");
            InspectReport {
                file: path.to_path_buf(),
                segments,
                error: None,
            }
        }
        Err(error) => {
            warn!(file = %path.display(), error = %error, "Cannot inspect");
            InspectReport {
                file: path.to_path_buf(),
                segments: Vec::new(),
                error: Some(error),
            }
        }
    }
}

/// One report per eligible file directly inside `dir`.
pub fn inspect_directory(dir: &Path, order: SortStrategy) -> Result<Vec<InspectReport>> {
    let files = collect_files_sorted(dir, JPEG_SUFFIXES, order).map_err(|source| {
        ScrubError::InputDirectory {
            path: dir.to_path_buf(),
            source,
        }
    })?;
    Ok(files.iter().map(|f| inspect_file(f)).collect())
}
