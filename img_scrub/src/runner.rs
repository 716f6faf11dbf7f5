//! Batch re-encoder
//!
//! One synchronous pass over the eligible files of a folder. Files are
//! handled strictly one after another; a bad file is reported and skipped,
//! never fatal. Cancellation is checked between files only.

use crate::config::{JobConfig, Quality};
use crate::encoder::{reencode_file, EncodeOptions};
use crate::error::{ConfigError, Result, ScrubError};
use crate::progress::{ProgressEvent, ProgressSink};
use shared_utils::common_utils::file_name_lossy;
use shared_utils::{
    check_input_output_conflict, collect_files_sorted, BatchResult, PathValidationError, JPEG_SUFFIXES,
};
use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// Cooperative cancellation flag shared between the runner and whoever may
/// want to stop it (a Ctrl-C handler, a UI button).
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// `run(input_dir, output_dir, quality)` with raw values, as a front end
/// would capture them. Returns the batch result; `counts()` gives
/// `(processed_count, total_count)`.
pub fn run(
    input_dir: &str,
    output_dir: &str,
    quality: i64,
    sink: &mut dyn ProgressSink,
) -> Result<BatchResult> {
    let config = JobConfig::new(input_dir, output_dir, Quality::new(quality)?)?;
    run_job(&config, sink, &CancelToken::new())
}

pub fn run_job(
    config: &JobConfig,
    sink: &mut dyn ProgressSink,
    cancel: &CancelToken,
) -> Result<BatchResult> {
    let input_dir = config.input_dir();
    let output_dir = config.output_dir();
    let span = info_span!("batch", input = %input_dir.display(), output = %output_dir.display());
    let _enter = span.enter();

    fs::create_dir_all(output_dir).map_err(|source| ScrubError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    })?;

    check_input_output_conflict(input_dir, output_dir).map_err(|e| match e {
        PathValidationError::InputOutputConflict { path } => ConfigError::InputOutputConflict(path),
        PathValidationError::EmptyPath => ConfigError::MissingOutput,
    })?;

    let files = collect_files_sorted(input_dir, JPEG_SUFFIXES, config.order()).map_err(|source| {
        ScrubError::InputDirectory {
            path: input_dir.to_path_buf(),
            source,
        }
    })?;

    let total = files.len();
    let mut result = BatchResult::new(total);
    let options = EncodeOptions {
        quality: config.quality(),
        auto_orient: config.auto_orient(),
    };

    info!(total, quality = %config.quality(), order = ?config.order(), "Starting batch");
    sink.on_event(ProgressEvent::Started { total });

    if total == 0 {
        info!("No image files found in input folder.");
    }

    let start = Instant::now();
    for src in files {
        if cancel.is_cancelled() {
            result.cancel();
            warn!(remaining = result.skipped, "Cancellation requested, stopping");
            break;
        }

        let file_name = file_name_lossy(&src);
        let dst = output_dir.join(src.file_name().unwrap_or_default());
        debug!(file = %file_name, "Re-encoding");

        match reencode_file(&src, &dst, &options) {
            Ok(stats) => {
                result.success(stats.input_bytes, stats.output_bytes);
                sink.on_event(ProgressEvent::Processed {
                    file_name,
                    processed: result.succeeded,
                    total,
                    input_bytes: stats.input_bytes,
                    output_bytes: stats.output_bytes,
                });
            }
            Err(e) => {
                let error = e.to_string();
                result.fail(src.clone(), error.clone());
                sink.on_event(ProgressEvent::Failed { file_name, error });
            }
        }
    }

    info!(
        processed = result.succeeded,
        failed = result.failed,
        skipped = result.skipped,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch finished"
    );
    sink.on_event(ProgressEvent::Finished {
        processed: result.succeeded,
        total,
        cancelled: result.cancelled,
    });

    Ok(result)
}

/// Run the batch on a worker thread. Events reach the caller through `sink`
/// (typically an `mpsc::Sender<ProgressEvent>`).
pub fn spawn<S>(config: JobConfig, mut sink: S, cancel: CancelToken) -> std::io::Result<JoinHandle<Result<BatchResult>>>
where
    S: ProgressSink + Send + 'static,
{
    thread::Builder::new()
        .name("img-scrub-batch".to_string())
        .spawn(move || run_job(&config, &mut sink, &cancel))
}

/// Wait for a worker started with `spawn`.
pub fn join(handle: JoinHandle<Result<BatchResult>>) -> Result<BatchResult> {
    handle.join().map_err(|_| ScrubError::Worker)?
}
