//! Output layout builder: the fixed on-disk schema the static viewer expects.
//!
//! ```text
//! <output_root>/
//!   index.html
//!   assets/css/<stylesheets>
//!   assets/js/<scripts>
//!   pages/page001.jpg, page002.jpg, …
//! ```
//!
//! Page filenames carry a zero-padded sequence number wide enough for the
//! document's page count (minimum 3 digits), so lexicographic filename order
//! equals document page order and no manifest file is needed.
//!
//! Rebuilding into the same root overwrites the previous run: the pages and
//! assets areas are cleared first, so a shorter document never inherits stale
//! page files and a different viewer bundle never inherits the previous
//! bundle's files.

use crate::assets::{render_index, ViewerAssets};
use crate::error::FlipbookError;
use crate::pipeline::strategy::ExtractionResult;
use crate::progress::ProgressCallback;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The written output tree.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Root directory of the flipbook.
    pub root: PathBuf,
    /// Path to the entry-point document (`<root>/index.html`).
    pub index_html: PathBuf,
    /// Page file names in document order, relative to `pages/`.
    pub page_files: Vec<String>,
}

/// Zero-pad width for a document of `page_count` pages, minimum 3.
///
/// 1000 pages need width 4 — with only 3 digits, `page1000.jpg` would sort
/// between `page100.jpg` and `page101.jpg`.
pub fn filename_width(page_count: usize) -> usize {
    page_count.to_string().len().max(3)
}

/// Deterministic page file name for a 1-based page index.
pub fn page_file_name(index: usize, width: usize) -> String {
    format!("page{index:0width$}.jpg")
}

/// Write the full output tree for one conversion.
///
/// Any I/O failure aborts and surfaces as [`FlipbookError::LayoutWrite`];
/// no partial cleanup is attempted — the caller discards the half-written
/// root.
pub fn build(
    output_root: &Path,
    result: &ExtractionResult,
    assets: &ViewerAssets,
    title: &str,
    progress: Option<&ProgressCallback>,
) -> Result<OutputLayout, FlipbookError> {
    let pages_dir = output_root.join("pages");
    let assets_dir = output_root.join("assets");
    let css_dir = assets_dir.join("css");
    let js_dir = assets_dir.join("js");

    // Overwrite semantics: never merge with a previous run's pages or assets.
    for dir in [&pages_dir, &assets_dir] {
        if dir.exists() {
            std::fs::remove_dir_all(dir).map_err(|e| FlipbookError::LayoutWrite {
                path: dir.clone(),
                source: e,
            })?;
        }
    }
    for dir in [&pages_dir, &css_dir, &js_dir] {
        std::fs::create_dir_all(dir).map_err(|e| FlipbookError::LayoutWrite {
            path: dir.clone(),
            source: e,
        })?;
    }

    let total = result.page_count();
    let width = filename_width(total);
    let mut page_files = Vec::with_capacity(total);

    for page in result.pages() {
        let name = page_file_name(page.index, width);
        let path = pages_dir.join(&name);
        std::fs::write(&path, &page.bytes).map_err(|e| FlipbookError::LayoutWrite {
            path: path.clone(),
            source: e,
        })?;
        debug!("Wrote {} ({} bytes)", path.display(), page.len());
        if let Some(cb) = progress {
            cb.on_page_written(page.index, total);
        }
        page_files.push(name);
    }

    for (dir, files) in [(&css_dir, &assets.css), (&js_dir, &assets.js)] {
        for file in files {
            let path = dir.join(&file.name);
            std::fs::write(&path, &file.contents).map_err(|e| FlipbookError::LayoutWrite {
                path: path.clone(),
                source: e,
            })?;
        }
    }

    let index_html = output_root.join("index.html");
    let html = render_index(title, &page_files, assets);
    std::fs::write(&index_html, html).map_err(|e| FlipbookError::LayoutWrite {
        path: index_html.clone(),
        source: e,
    })?;

    Ok(OutputLayout {
        root: output_root.to_path_buf(),
        index_html,
        page_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::strategy::ExtractedPage;

    fn synthetic(n: usize) -> ExtractionResult {
        let pages = (1..=n)
            .map(|i| ExtractedPage::new(i, format!("jpeg-bytes-{i}").into_bytes()))
            .collect();
        ExtractionResult::new(pages).unwrap()
    }

    #[test]
    fn width_is_at_least_three() {
        assert_eq!(filename_width(1), 3);
        assert_eq!(filename_width(999), 3);
        assert_eq!(filename_width(1000), 4);
        assert_eq!(filename_width(12345), 5);
    }

    #[test]
    fn five_pages_get_expected_names() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("book");
        let layout = build(&root, &synthetic(5), &ViewerAssets::embedded(), "t", None).unwrap();

        assert_eq!(
            layout.page_files,
            ["page001.jpg", "page002.jpg", "page003.jpg", "page004.jpg", "page005.jpg"]
        );

        let mut on_disk: Vec<String> = std::fs::read_dir(root.join("pages"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        on_disk.sort();
        assert_eq!(on_disk, layout.page_files, "lexicographic order = page order");
    }

    #[test]
    fn thousand_pages_sort_lexicographically() {
        let width = filename_width(1000);
        let mut names: Vec<String> = (1..=1000).map(|i| page_file_name(i, width)).collect();
        let numeric_order = names.clone();
        names.sort();
        assert_eq!(names, numeric_order, "no page1/page10 ambiguity");
    }

    #[test]
    fn rebuild_is_byte_identical_and_drops_stale_pages() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("book");
        let assets = ViewerAssets::embedded();

        build(&root, &synthetic(5), &assets, "t", None).unwrap();
        // Second run with fewer pages must not inherit page004/page005.
        build(&root, &synthetic(3), &assets, "t", None).unwrap();
        assert!(!root.join("pages/page004.jpg").exists());
        assert!(!root.join("pages/page005.jpg").exists());

        let first_index = std::fs::read(root.join("index.html")).unwrap();
        let first_page = std::fs::read(root.join("pages/page001.jpg")).unwrap();
        build(&root, &synthetic(3), &assets, "t", None).unwrap();
        assert_eq!(std::fs::read(root.join("index.html")).unwrap(), first_index);
        assert_eq!(std::fs::read(root.join("pages/page001.jpg")).unwrap(), first_page);
    }

    #[test]
    fn rebuild_replaces_previous_asset_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("book");

        let mut remote = ViewerAssets::embedded();
        remote.css[0].name = "page-flip.css".to_string();
        remote.js[0].name = "page-flip.js".to_string();
        build(&root, &synthetic(2), &remote, "t", None).unwrap();
        assert!(root.join("assets/css/page-flip.css").is_file());

        build(&root, &synthetic(2), &ViewerAssets::embedded(), "t", None).unwrap();
        assert!(!root.join("assets/css/page-flip.css").exists());
        assert!(!root.join("assets/js/page-flip.js").exists());
        assert!(root.join("assets/css/flipbook.css").is_file());
        assert!(root.join("assets/js/flipbook.js").is_file());
    }

    #[test]
    fn layout_matches_viewer_schema() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("book");
        let layout = build(&root, &synthetic(2), &ViewerAssets::embedded(), "t", None).unwrap();

        assert!(layout.index_html.is_file());
        assert!(root.join("assets/css/flipbook.css").is_file());
        assert!(root.join("assets/js/flipbook.js").is_file());
        assert!(root.join("pages/page001.jpg").is_file());

        let html = std::fs::read_to_string(&layout.index_html).unwrap();
        assert!(html.contains("pages/page001.jpg"));
        assert!(html.contains("pages/page002.jpg"));
        assert!(!html.contains("page003.jpg"));
    }
}
