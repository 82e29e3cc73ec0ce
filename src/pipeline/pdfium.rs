//! Library strategy backed by pdfium.
//!
//! ## Why JPEG, not PNG?
//!
//! Flipbook pages are photographs of pages, served straight to a browser.
//! A 300-DPI A4 page PNG easily reaches 5–10 MB; at JPEG quality 95 the same
//! page is a few hundred KB with no visible loss for text and line art, which
//! keeps the final ZIP shippable. The quality knob is surfaced through
//! [`crate::config::ConversionConfig::jpeg_quality`].
//!
//! ## Availability vs. failure
//!
//! Failing to *bind* the pdfium shared library means the mechanism is absent
//! from this environment → `Unavailable`, and the chain moves on. Anything
//! after a successful bind (corrupt document, render error) is `Failed`.

use crate::pipeline::strategy::{
    ExtractedPage, ExtractionResult, PageRasterizer, StrategyOutcome,
};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView};
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Rasterizes via the pdfium library (`pdfium-render` bindings).
pub struct PdfiumStrategy {
    jpeg_quality: u8,
}

impl PdfiumStrategy {
    pub fn new(jpeg_quality: u8) -> Self {
        Self { jpeg_quality }
    }

    /// Bind pdfium from the executable's directory, the current directory,
    /// or the system library path — the standard pdfium-render probe order.
    fn bind() -> Result<Pdfium, String> {
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map(Pdfium::new)
            .map_err(|e| format!("pdfium library not found: {e:?}"))
    }

    /// Re-encode one rendered page as JPEG at the configured quality.
    fn encode_page(&self, image: &DynamicImage) -> Result<Vec<u8>, String> {
        // Pdfium hands back RGBA bitmaps; JPEG has no alpha channel.
        let rgb = image.to_rgb8();
        let mut buf = Vec::new();
        let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), self.jpeg_quality);
        rgb.write_with_encoder(encoder)
            .map_err(|e| format!("JPEG encoding failed: {e}"))?;
        Ok(buf)
    }
}

impl PageRasterizer for PdfiumStrategy {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn extract(&self, source: &Path, dpi: u32) -> StrategyOutcome {
        if !source.is_file() {
            return StrategyOutcome::Failed(format!("source not found: {}", source.display()));
        }

        let pdfium = match Self::bind() {
            Ok(pdfium) => pdfium,
            Err(reason) => return StrategyOutcome::Unavailable(reason),
        };

        let document = match pdfium.load_pdf_from_file(source, None) {
            Ok(doc) => doc,
            Err(e) => return StrategyOutcome::Failed(format!("failed to load PDF: {e:?}")),
        };

        // PDF native units are 1/72 inch, so dpi/72 is the uniform scale
        // factor for both axes of each page's native size.
        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let page_count = document.pages().len() as usize;
        let mut pages = Vec::with_capacity(page_count);

        for (idx, page) in document.pages().iter().enumerate() {
            let page_num = idx + 1;
            let bitmap = match page.render_with_config(&render_config) {
                Ok(bitmap) => bitmap,
                Err(e) => {
                    return StrategyOutcome::Failed(format!(
                        "rendering page {page_num} failed: {e:?}"
                    ))
                }
            };
            let image = bitmap.as_image();
            debug!(
                "pdfium rendered page {} → {}x{} px",
                page_num,
                image.width(),
                image.height()
            );

            match self.encode_page(&image) {
                Ok(bytes) => pages.push(ExtractedPage::new(page_num, bytes)),
                Err(reason) => {
                    return StrategyOutcome::Failed(format!("page {page_num}: {reason}"))
                }
            }
        }

        match ExtractionResult::new(pages) {
            Ok(result) => StrategyOutcome::Success(result),
            Err(reason) => StrategyOutcome::Failed(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn encoded_page_is_a_jpeg() {
        let strategy = PdfiumStrategy::new(95);
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 16, image::Rgb([200, 10, 10])));
        let bytes = strategy.encode_page(&img).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn quality_changes_output_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        }));
        let high = PdfiumStrategy::new(95).encode_page(&img).unwrap();
        let low = PdfiumStrategy::new(20).encode_page(&img).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn missing_source_reports_failed() {
        let strategy = PdfiumStrategy::new(95);
        match strategy.extract(Path::new("/no/such/file.pdf"), 150) {
            StrategyOutcome::Failed(reason) => assert!(reason.contains("source not found")),
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
