//! Input validation: make sure the source is a readable PDF before any
//! strategy runs.
//!
//! Probing happens up front so "file does not exist" surfaces as a precise
//! input error instead of N identical strategy failures. We validate the
//! `%PDF` magic bytes too — both backends give much worse diagnostics on
//! arbitrary binary input than a simple "this is not a PDF".

use crate::error::FlipbookError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate existence, read permission, and PDF magic bytes.
pub fn resolve(path: &Path) -> Result<PathBuf, FlipbookError> {
    if !path.exists() {
        return Err(FlipbookError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(f) => {
            let mut head = Vec::with_capacity(4);
            f.take(4)
                .read_to_end(&mut head)
                .map_err(|e| FlipbookError::Internal(format!(
                    "reading '{}': {e}",
                    path.display()
                )))?;
            // A file shorter than the magic is not a PDF either; the missing
            // bytes stay zero in the reported magic.
            let mut magic = [0u8; 4];
            magic[..head.len()].copy_from_slice(&head);
            if &magic != b"%PDF" {
                return Err(FlipbookError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(FlipbookError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(FlipbookError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Resolved source PDF: {}", path.display());
    Ok(path.to_path_buf())
}
