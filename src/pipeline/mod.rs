//! Pipeline stages for PDF-to-flipbook conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. add a rasterization backend) without touching the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ chain ──▶ layout ──▶ archive
//! (path)   (pdftoppm   (pages/,    (.zip)
//!           or pdfium)  assets/,
//!                       index.html)
//! ```
//!
//! 1. [`input`]    — validate the source path and PDF magic bytes
//! 2. [`chain`]    — try rasterization strategies in priority order;
//!    [`pdftoppm`] first (fast, external tool), [`pdfium`] as fallback;
//!    the [`strategy`] module defines their shared contract
//! 3. [`layout`]   — write the deterministic viewer tree
//! 4. [`archive`]  — package the tree into a ZIP

use std::sync::Arc;

pub mod archive;
pub mod chain;
pub mod input;
pub mod layout;
pub mod pdfium;
pub mod pdftoppm;
pub mod strategy;

use crate::config::ConversionConfig;
use strategy::PageRasterizer;

/// The default strategy order: external tool first (no library loading,
/// typically faster), pdfium as the in-process fallback.
pub fn default_strategies(config: &ConversionConfig) -> Vec<Arc<dyn PageRasterizer>> {
    vec![
        Arc::new(pdftoppm::PdftoppmStrategy::new(
            config.jpeg_quality,
            config.strategy_timeout_secs,
        )),
        Arc::new(pdfium::PdfiumStrategy::new(config.jpeg_quality)),
    ]
}
