//! Configuration types for PDF-to-flipbook conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads and to diff two runs to
//! understand why their outputs differ.

use crate::error::FlipbookError;
use crate::pipeline::strategy::PageRasterizer;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the viewer asset bundle comes from.
#[derive(Debug, Clone)]
pub enum AssetSource {
    /// Fetch the StPageFlip bundle from unpkg; fall back to the embedded
    /// bundle when the download fails.
    Remote {
        /// Per-request timeout in seconds.
        timeout_secs: u64,
    },
    /// Use the embedded fallback bundle; no network access at all.
    Embedded,
}

impl Default for AssetSource {
    fn default() -> Self {
        AssetSource::Remote { timeout_secs: 30 }
    }
}

/// Configuration for a PDF-to-flipbook conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2flip::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .output_dir("my_flipbook")
///     .offline(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI applied uniformly to both axes of each page's native
    /// size. Range: 72–600. Default: 300.
    ///
    /// 300 DPI keeps small print legible when a viewer zooms in; drop to 150
    /// for slide decks or anything destined for small screens, where the
    /// halved file sizes matter more than pixel density.
    pub dpi: u32,

    /// Root directory for the generated flipbook. Default: `flipbook_output`.
    ///
    /// The ZIP archive lands next to it as `<output_dir>.zip`. Concurrent
    /// conversions must use distinct output directories — the layout builder
    /// is not collision-aware.
    pub output_dir: PathBuf,

    /// JPEG quality for re-encoded page images, 1–100. Default: 95.
    ///
    /// 95 keeps text and line art visually lossless while staying an order
    /// of magnitude smaller than PNG at flipbook resolutions.
    pub jpeg_quality: u8,

    /// Upper bound in seconds for each strategy attempt. Default: 120.
    /// 0 disables the bound.
    ///
    /// An external renderer that hangs on a pathological PDF would otherwise
    /// stall the conversion indefinitely; after the deadline the attempt is
    /// treated as failed and the chain falls through to the next strategy.
    pub strategy_timeout_secs: u64,

    /// Viewer asset bundle source. Default: remote with embedded fallback.
    pub assets: AssetSource,

    /// Title shown in the viewer header and `<title>`. Default: "PDF Flipbook".
    pub title: String,

    /// Rasterization strategies in priority order. Empty (the default) means
    /// the built-in chain: `pdftoppm` first, pdfium second.
    pub strategies: Vec<Arc<dyn PageRasterizer>>,

    /// Optional progress event sink.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            output_dir: PathBuf::from("flipbook_output"),
            jpeg_quality: 95,
            strategy_timeout_secs: 120,
            assets: AssetSource::default(),
            title: "PDF Flipbook".to_string(),
            strategies: Vec::new(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("output_dir", &self.output_dir)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("strategy_timeout_secs", &self.strategy_timeout_secs)
            .field("assets", &self.assets)
            .field("title", &self.title)
            .field(
                "strategies",
                &self
                    .strategies
                    .iter()
                    .map(|s| s.name().to_string())
                    .collect::<Vec<_>>(),
            )
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn strategy_timeout_secs(mut self, secs: u64) -> Self {
        self.config.strategy_timeout_secs = secs;
        self
    }

    pub fn assets(mut self, source: AssetSource) -> Self {
        self.config.assets = source;
        self
    }

    /// Shorthand for `assets(AssetSource::Embedded)`.
    pub fn offline(mut self, offline: bool) -> Self {
        if offline {
            self.config.assets = AssetSource::Embedded;
        }
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Replace the default strategy chain with a caller-supplied priority order.
    pub fn strategies(mut self, strategies: Vec<Arc<dyn PageRasterizer>>) -> Self {
        self.config.strategies = strategies;
        self
    }

    pub fn progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.config.progress_callback = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, FlipbookError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(FlipbookError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(FlipbookError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.output_dir.file_name().is_none() {
            return Err(FlipbookError::InvalidConfig(format!(
                "output directory '{}' has no usable name for the archive",
                c.output_dir.display()
            )));
        }
        Ok(self.config)
    }
}
