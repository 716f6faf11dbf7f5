//! Shared Utilities for the img-scrub tools
//!
//! This crate provides common functionality shared across the workspace:
//! - Batch file collection and result accounting
//! - File ordering strategies
//! - Progress bar and summary reporting
//! - Logging setup (file + stderr)
//! - Path validation
//! - JPEG marker segment scanning

pub mod batch;
pub mod common_utils;
pub mod file_sorter;
pub mod jpeg_segments;
pub mod logging;
pub mod path_validator;
pub mod progress;
pub mod report;

pub use batch::{collect_files, collect_files_sorted, BatchResult, JPEG_SUFFIXES};
pub use file_sorter::{FileSorter, SortStrategy};
pub use jpeg_segments::{metadata_segments, scan_segments, JpegSegment, SegmentError, SegmentKind};
pub use path_validator::{check_input_output_conflict, validate_path, PathValidationError};
pub use progress::{create_progress_bar, format_bytes, format_duration};
pub use report::{format_summary_report, print_simple_summary, print_summary_report};
