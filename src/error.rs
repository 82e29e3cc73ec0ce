//! Error types for the pdf2flip library.
//!
//! Two levels of failure exist and only one of them lives here:
//!
//! * [`FlipbookError`] — **Terminal**: the conversion cannot produce a
//!   flipbook at all (bad input file, every rasterization strategy failed,
//!   filesystem error while writing the layout or archive). Returned as
//!   `Err(FlipbookError)` from the top-level `convert*` functions.
//!
//! * Strategy-local failures — a single rasterization mechanism being absent
//!   or erroring out. These are *expected* control flow: the strategy chain
//!   probes mechanisms in priority order, so they are modelled as
//!   [`crate::pipeline::strategy::StrategyOutcome`] variants, logged, and
//!   swallowed. They only surface here, aggregated, when the last strategy
//!   has also failed ([`FlipbookError::AllStrategiesExhausted`]).

use std::path::PathBuf;
use thiserror::Error;

/// One failed attempt recorded by the strategy chain.
///
/// Kept structured (rather than pre-formatted) so callers can inspect which
/// mechanism failed and why, e.g. to suggest `apt-get install poppler-utils`.
#[derive(Debug, Clone)]
pub struct StrategyAttempt {
    /// Strategy name, e.g. `"pdftoppm"` or `"pdfium"`.
    pub strategy: String,
    /// Human-readable reason: "not installed", stderr excerpt, timeout note.
    pub reason: String,
}

impl std::fmt::Display for StrategyAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.strategy, self.reason)
    }
}

/// All terminal errors returned by the pdf2flip library.
#[derive(Debug, Error)]
pub enum FlipbookError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// Every registered rasterization strategy failed or was unavailable.
    #[error(
        "All {} rasterization strategies failed:\n{}",
        attempts.len(),
        attempts.iter().map(|a| format!("  - {a}")).collect::<Vec<_>>().join("\n")
    )]
    AllStrategiesExhausted { attempts: Vec<StrategyAttempt> },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Filesystem failure while writing the output tree. No partial cleanup
    /// is attempted; the caller should discard the half-written directory.
    #[error("Failed to write output file '{path}': {source}")]
    LayoutWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem failure while producing the ZIP archive.
    #[error("Failed to package archive '{path}': {detail}")]
    Packaging { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_display_lists_every_attempt() {
        let e = FlipbookError::AllStrategiesExhausted {
            attempts: vec![
                StrategyAttempt {
                    strategy: "pdftoppm".into(),
                    reason: "not installed".into(),
                },
                StrategyAttempt {
                    strategy: "pdfium".into(),
                    reason: "corrupt xref table".into(),
                },
            ],
        };
        let msg = e.to_string();
        assert!(msg.contains("All 2 rasterization strategies failed"), "got: {msg}");
        assert!(msg.contains("pdftoppm: not installed"));
        assert!(msg.contains("pdfium: corrupt xref table"));
    }

    #[test]
    fn not_a_pdf_display_includes_magic() {
        let e = FlipbookError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"hell",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn layout_write_preserves_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let e = FlipbookError::LayoutWrite {
            path: PathBuf::from("out/pages/page001.jpg"),
            source: io,
        };
        assert!(e.to_string().contains("page001.jpg"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
