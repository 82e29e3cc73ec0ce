//! The rasterization strategy contract and its data types.
//!
//! A strategy is one concrete mechanism for turning a PDF into an ordered
//! sequence of encoded page images: an external tool (`pdftoppm`), a library
//! (pdfium), or a synthetic stand-in inside a test. Every strategy answers
//! through the same three-way [`StrategyOutcome`] so the chain can tell
//! "this mechanism is not present here" apart from "it ran and broke" —
//! both trigger fallback, but the reported reason differs.

use std::path::Path;

/// A single rasterized page: 1-based index plus encoded image bytes (JPEG).
///
/// Ownership transfers to the layout builder, which persists the bytes to
/// disk and drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    /// 1-based page index matching source document order.
    pub index: usize,
    /// Encoded image bytes, one complete file per page.
    pub bytes: Vec<u8>,
}

impl ExtractedPage {
    pub fn new(index: usize, bytes: Vec<u8>) -> Self {
        Self { index, bytes }
    }

    /// Byte length of the encoded image.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An ordered, validated sequence of extracted pages.
///
/// Invariant, enforced at construction: indices are strictly `1..=N` with no
/// gaps or duplicates, so the layout builder never has to re-sort or second-
/// guess a strategy's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pages: Vec<ExtractedPage>,
}

impl ExtractionResult {
    /// Validate and wrap a page sequence.
    ///
    /// Returns a human-readable reason on violation; strategies turn that
    /// into [`StrategyOutcome::Failed`].
    pub fn new(pages: Vec<ExtractedPage>) -> Result<Self, String> {
        if pages.is_empty() {
            return Err("produced zero pages".to_string());
        }
        for (i, page) in pages.iter().enumerate() {
            let expected = i + 1;
            if page.index != expected {
                return Err(format!(
                    "page indices must be contiguous from 1: expected {expected}, got {}",
                    page.index
                ));
            }
        }
        Ok(Self { pages })
    }

    /// Total page count (equals the source document's page count).
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[ExtractedPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<ExtractedPage> {
        self.pages
    }
}

/// The tagged result of one strategy attempt.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// The mechanism ran and produced a full, validated page sequence.
    Success(ExtractionResult),
    /// The mechanism itself could not run (tool or library not present).
    Unavailable(String),
    /// The mechanism ran but errored: non-zero exit, exception, zero pages.
    Failed(String),
}

/// One page-to-image mechanism behind a uniform contract.
///
/// `extract` is synchronous and may block for the whole document; the
/// [`crate::pipeline::chain::StrategyChain`] moves each call onto tokio's
/// blocking pool and bounds it with a timeout. Implementations must not
/// write inside `source`'s directory — a staging `TempDir` is the expected
/// place for tool-based variants that need disk.
pub trait PageRasterizer: Send + Sync {
    /// Short stable name used in logs and aggregated error reports.
    fn name(&self) -> &str;

    /// Render every page of `source` at `dpi` and return encoded image bytes
    /// per page, in document order.
    fn extract(&self, source: &Path, dpi: u32) -> StrategyOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(i: usize) -> ExtractedPage {
        ExtractedPage::new(i, vec![0xFF, 0xD8, i as u8])
    }

    #[test]
    fn result_accepts_contiguous_pages() {
        let r = ExtractionResult::new(vec![page(1), page(2), page(3)]).unwrap();
        assert_eq!(r.page_count(), 3);
        assert_eq!(r.pages()[2].index, 3);
    }

    #[test]
    fn result_rejects_empty() {
        let err = ExtractionResult::new(vec![]).unwrap_err();
        assert!(err.contains("zero pages"));
    }

    #[test]
    fn result_rejects_gap() {
        let err = ExtractionResult::new(vec![page(1), page(3)]).unwrap_err();
        assert!(err.contains("expected 2"));
    }

    #[test]
    fn result_rejects_duplicate() {
        assert!(ExtractionResult::new(vec![page(1), page(1)]).is_err());
    }

    #[test]
    fn result_rejects_zero_based_indexing() {
        assert!(ExtractionResult::new(vec![page(0), page(1)]).is_err());
    }

    #[test]
    fn result_rejects_out_of_order() {
        assert!(ExtractionResult::new(vec![page(2), page(1)]).is_err());
    }
}
