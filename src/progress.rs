//! Progress-callback trait for per-file summarisation events.
//!
//! Inject an [`Arc<dyn SummaryProgressCallback>`] via
//! [`crate::config::SummaryConfigBuilder::progress_callback`] to receive an
//! event as the pipeline reaches each poster. The callback approach is the
//! least-invasive integration point: callers can forward events to a
//! terminal progress bar, a log file, or a UI without the library knowing
//! anything about how the host application communicates.
//!
//! Posters are processed one at a time, so events for a run arrive in file
//! order from a single task; the trait is still `Send + Sync` so callbacks
//! can be shared across the async runtime.

use std::sync::Arc;

/// Called by the pipeline as it processes each poster image.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SummaryProgressCallback: Send + Sync {
    /// Called once after the folder scan, before any image is processed.
    fn on_run_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before an image is read and sent to the model.
    ///
    /// `index` is 1-based.
    fn on_poster_start(&self, index: usize, total: usize, file_name: &str) {
        let _ = (index, total, file_name);
    }

    /// Called when a poster produced a report entry (structured or raw
    /// fallback).
    fn on_poster_complete(&self, index: usize, total: usize, file_name: &str, structured: bool) {
        let _ = (index, total, file_name, structured);
    }

    /// Called when a poster's image read or model call failed. The run
    /// continues; the report gets an error entry for this file.
    fn on_poster_error(&self, index: usize, total: usize, file_name: &str, error: String) {
        let _ = (index, total, file_name, error);
    }

    /// Called once after every file has been attempted.
    ///
    /// `succeeded` counts entries that did not fail (structured + fallback).
    fn on_run_complete(&self, total_files: usize, succeeded: usize) {
        let _ = (total_files, succeeded);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SummaryProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummaryConfig`].
pub type ProgressCallback = Arc<dyn SummaryProgressCallback>;
