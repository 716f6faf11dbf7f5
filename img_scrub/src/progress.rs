//! Progress and error reporting
//!
//! The runner knows nothing about presentation. It emits `ProgressEvent`s
//! into a `ProgressSink`; front ends decide what to do with them.

use indicatif::ProgressBar;
use serde::Serialize;
use std::sync::mpsc::Sender;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Enumeration done; `total` eligible files will be attempted.
    Started { total: usize },
    /// One more file written.
    Processed {
        file_name: String,
        processed: usize,
        total: usize,
        input_bytes: u64,
        output_bytes: u64,
    },
    /// One file could not be processed; the batch continues.
    Failed { file_name: String, error: String },
    Finished {
        processed: usize,
        total: usize,
        cancelled: bool,
    },
}

pub trait ProgressSink {
    fn on_event(&mut self, event: ProgressEvent);
}

impl<S: ProgressSink + ?Sized> ProgressSink for &mut S {
    fn on_event(&mut self, event: ProgressEvent) {
        (**self).on_event(event)
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn on_event(&mut self, event: ProgressEvent) {
        (**self).on_event(event)
    }
}

/// Forward events to another thread. A dropped receiver is not an error:
/// the batch keeps going with nobody listening.
impl ProgressSink for Sender<ProgressEvent> {
    fn on_event(&mut self, event: ProgressEvent) {
        let _ = self.send(event);
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_event(&mut self, _event: ProgressEvent) {}
}

/// Writes every event to the tracing log.
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn on_event(&mut self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { total } => info!(total, "Found eligible images"),
            ProgressEvent::Processed {
                file_name,
                processed,
                total,
                ..
            } => info!(file = %file_name, "Progress: {}/{} images processed", processed, total),
            ProgressEvent::Failed { file_name, error } => {
                warn!(file = %file_name, error = %error, "Failed to process")
            }
            ProgressEvent::Finished {
                processed,
                cancelled,
                ..
            } => {
                if cancelled {
                    warn!(processed, "Processing cancelled");
                } else {
                    info!(processed, "Processing complete! {} images processed.", processed);
                }
            }
        }
    }
}

/// Drives an indicatif bar and mirrors events into the log. Failures are
/// printed above the bar and logged at debug level only, so they show once.
pub struct BarSink {
    bar: ProgressBar,
    log: LogSink,
}

impl BarSink {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar, log: LogSink }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl ProgressSink for BarSink {
    fn on_event(&mut self, event: ProgressEvent) {
        match &event {
            ProgressEvent::Started { total } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
            }
            ProgressEvent::Processed { file_name, .. } => {
                self.bar.set_message(file_name.clone());
                self.bar.inc(1);
            }
            ProgressEvent::Failed { file_name, error } => {
                self.bar
                    .println(format!("  ❌ Failed to process {}: {}", file_name, error));
                self.bar.inc(1);
            }
            ProgressEvent::Finished { .. } => self.bar.finish_and_clear(),
        }
        if let ProgressEvent::Failed { file_name, error } = event {
            debug!(file = %file_name, error = %error, "Failed to process");
            return;
        }
        self.bar.suspend(|| self.log.on_event(event));
    }
}

/// Keeps every event; used by tests and by callers that want the raw stream.
#[derive(Debug, Default)]
pub struct CollectSink {
    pub events: Vec<ProgressEvent>,
}

impl CollectSink {
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Failed { file_name, error } => Some((file_name.as_str(), error.as_str())),
                _ => None,
            })
            .collect()
    }

    /// `(processed, total)` pairs in emission order.
    pub fn progress(&self) -> Vec<(usize, usize)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Processed {
                    processed, total, ..
                } => Some((*processed, *total)),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for CollectSink {
    fn on_event(&mut self, event: ProgressEvent) {
        self.events.push(event);
    }
}
