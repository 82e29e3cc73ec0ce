//! Conversion entry points: the full pipeline from PDF path to ZIP archive.

use crate::config::ConversionConfig;
use crate::error::FlipbookError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::chain::StrategyChain;
use crate::pipeline::{archive, default_strategies, input, layout};
use crate::assets;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Convert a PDF file into a packaged HTML5 flipbook.
///
/// This is the primary entry point for the library. The pipeline runs each
/// stage to completion before the next: rasterize (first working strategy),
/// write the viewer layout, package the ZIP. Pages are processed
/// sequentially — each conversion is independent, so callers wanting
/// parallelism run whole conversions side by side with distinct
/// `output_dir`s.
///
/// # Errors
/// Returns `Err(FlipbookError)` when the input is not a readable PDF, every
/// rasterization strategy fails, or writing the layout/archive hits an I/O
/// error. On failure no archive is produced; a partially-written output
/// directory may remain and should be discarded by the caller.
pub async fn convert(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, FlipbookError> {
    let total_start = Instant::now();
    let source = source.as_ref();
    info!("Starting conversion: {}", source.display());

    // ── Step 1: Validate input ───────────────────────────────────────────
    let source = input::resolve(source)?;

    // ── Step 2: Rasterize via the strategy chain ─────────────────────────
    let strategies = if config.strategies.is_empty() {
        default_strategies(config)
    } else {
        config.strategies.clone()
    };
    let mut chain = StrategyChain::new(strategies, config.strategy_timeout_secs);
    if let Some(ref cb) = config.progress_callback {
        chain = chain.with_progress(cb.clone());
    }

    let extract_start = Instant::now();
    let (result, strategy) = chain.extract(&source, config.dpi).await?;
    let extract_ms = extract_start.elapsed().as_millis() as u64;
    let page_count = result.page_count();
    info!(
        "Extracted {} pages via '{}' in {}ms",
        page_count, strategy, extract_ms
    );

    // ── Step 3: Resolve viewer assets and write the layout ──────────────
    let layout_start = Instant::now();
    let viewer = assets::resolve(&config.assets).await;
    let layout = layout::build(
        &config.output_dir,
        &result,
        &viewer,
        &config.title,
        config.progress_callback.as_ref(),
    )?;
    let layout_ms = layout_start.elapsed().as_millis() as u64;

    // ── Step 4: Package the archive ──────────────────────────────────────
    let package_start = Instant::now();
    let archive_path = archive::package(&layout.root)?;
    let package_ms = package_start.elapsed().as_millis() as u64;

    let archive_bytes = std::fs::metadata(&archive_path)
        .map(|m| m.len())
        .unwrap_or(0);
    if let Some(ref cb) = config.progress_callback {
        cb.on_archive_written(archive_bytes);
    }

    let stats = ConversionStats {
        extract_ms,
        layout_ms,
        package_ms,
        total_ms: total_start.elapsed().as_millis() as u64,
        archive_bytes,
    };

    info!(
        "Conversion complete: {} pages, {} → {} ({} bytes, {}ms total)",
        page_count,
        layout.root.display(),
        archive_path.display(),
        archive_bytes,
        stats.total_ms
    );

    Ok(ConversionOutput {
        output_dir: layout.root,
        archive_path,
        page_count,
        strategy,
        stats,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    source: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, FlipbookError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| FlipbookError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(source, config))
}
