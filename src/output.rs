//! Result types returned by the conversion entry points.

use serde::Serialize;
use std::path::PathBuf;

/// The finished flipbook: where it landed and how the run went.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// Root of the written viewer tree.
    pub output_dir: PathBuf,
    /// The packaged ZIP archive (`<output_dir>.zip` next to the directory).
    pub archive_path: PathBuf,
    /// Number of pages extracted and written.
    pub page_count: usize,
    /// Name of the rasterization strategy that produced the pages.
    pub strategy: String,
    /// Per-stage timings and sizes.
    pub stats: ConversionStats,
}

/// Wall-clock timings per pipeline stage plus the final archive size.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Rasterization (winning strategy only, including failed attempts
    /// before it).
    pub extract_ms: u64,
    /// Asset resolution + layout writing.
    pub layout_ms: u64,
    /// ZIP packaging.
    pub package_ms: u64,
    /// End-to-end duration.
    pub total_ms: u64,
    /// Final archive size in bytes.
    pub archive_bytes: u64,
}
