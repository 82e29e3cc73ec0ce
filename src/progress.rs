//! Progress-callback trait for conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves through its stages. Callers can forward
//! events to a terminal progress bar, a log, or a web socket without the
//! library knowing how the host application communicates.
//!
//! Strategies rasterize the whole document in one blocking call, so page
//! granularity is only available while the layout builder persists pages;
//! the extraction phase reports at strategy granularity instead.

use std::sync::Arc;

/// Called by the conversion pipeline as it progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// A rasterization strategy is about to be attempted.
    fn on_strategy_start(&self, name: &str) {
        let _ = name;
    }

    /// A strategy was skipped over (unavailable or failed); the chain moves on.
    fn on_strategy_failed(&self, name: &str, reason: &str) {
        let _ = (name, reason);
    }

    /// Extraction finished: `strategy` produced `total` pages.
    fn on_pages_extracted(&self, strategy: &str, total: usize) {
        let _ = (strategy, total);
    }

    /// One page file was written to the output layout (1-based index).
    fn on_page_written(&self, page_num: usize, total: usize) {
        let _ = (page_num, total);
    }

    /// The archive was written (`bytes` = final ZIP size).
    fn on_archive_written(&self, bytes: u64) {
        let _ = bytes;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
