//! img-scrub: strip metadata from a folder of JPEGs
//!
//! Every `.jpg`/`.jpeg` directly inside the input folder is decoded and
//! re-encoded into the output folder at a chosen quality. The fresh encode
//! carries no EXIF, XMP, ICC, IPTC or comment segments. Originals are never
//! modified.
//!
//! ```no_run
//! use img_scrub::{run, LogSink};
//!
//! let result = run("photos", "photos-clean", 85, &mut LogSink)?;
//! let (processed, total) = result.counts();
//! println!("{processed}/{total}");
//! # Ok::<(), img_scrub::ScrubError>(())
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod inspect;
pub mod progress;
pub mod runner;

#[cfg(test)]
mod test_support;

pub use config::{JobConfig, Quality};
pub use encoder::{reencode_file, EncodeOptions, EncodeStats};
pub use error::{ConfigError, FileError, Result, ScrubError};
pub use inspect::{inspect_directory, InspectReport};
pub use progress::{BarSink, CollectSink, LogSink, NullSink, ProgressEvent, ProgressSink};
pub use runner::{join, run, run_job, spawn, CancelToken};

pub use shared_utils::{BatchResult, SortStrategy};
