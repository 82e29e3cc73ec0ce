//! # pdf2flip
//!
//! Convert PDF documents into self-contained, offline HTML5 flipbooks.
//!
//! ## What it produces
//!
//! A directory of per-page JPEG images plus a static HTML/CSS/JS viewer,
//! packaged as a single ZIP archive:
//!
//! ```text
//! flipbook_output/
//!   index.html                      entry point, lists every page image
//!   assets/css/…  assets/js/…       viewer bundle (downloaded or embedded)
//!   pages/page001.jpg, page002.jpg  zero-padded so name order = page order
//! flipbook_output.zip               the same tree, index.html at the root
//! ```
//!
//! The result opens from `file://` with no server and no network — handy for
//! sharing a visual presentation of a PDF with people who just have a browser.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate path + %PDF magic
//!  ├─ 2. Extract  strategy chain: pdftoppm (external tool) → pdfium (library)
//!  ├─ 3. Layout   pages/ + assets/ + index.html, deterministic names
//!  └─ 4. Package  deflate ZIP, entries sorted for reproducible bytes
//! ```
//!
//! Rasterization goes through an ordered fallback chain: each mechanism
//! reports `Success`, `Unavailable` (not installed here), or `Failed`
//! (ran and broke), and the first success wins. The conversion only fails
//! when every registered strategy has failed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2flip::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .dpi(300)
//!         .output_dir("my_flipbook")
//!         .build()?;
//!     let output = convert("document.pdf", &config).await?;
//!     println!("archive: {}", output.archive_path.display());
//!     eprintln!("{} pages via {}", output.page_count, output.strategy);
//!     Ok(())
//! }
//! ```
//!
//! Synchronous callers can use [`convert_sync`] instead.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2flip` binary (clap + anyhow + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2flip = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod assets;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use assets::{AssetFile, ViewerAssets};
pub use config::{AssetSource, ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync};
pub use error::{FlipbookError, StrategyAttempt};
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::chain::StrategyChain;
pub use pipeline::layout::OutputLayout;
pub use pipeline::pdfium::PdfiumStrategy;
pub use pipeline::pdftoppm::PdftoppmStrategy;
pub use pipeline::strategy::{ExtractedPage, ExtractionResult, PageRasterizer, StrategyOutcome};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
