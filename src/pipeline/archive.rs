//! Archive packager: deterministic ZIP of the output layout.
//!
//! Entries are named by their path relative to `output_root` with
//! forward-slash separators, so `index.html` sits at the archive root and
//! unzipping anywhere reproduces the viewer tree exactly. Entries are sorted
//! by relative path before writing — directory-walk order varies across
//! filesystems, and sorting makes two runs over identical trees produce
//! identical archives.

use crate::error::FlipbookError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::FileOptions;

/// Package `output_root` into `<parent>/<name>.zip`.
///
/// On failure the partially-written archive is left in place; callers that
/// care should remove it explicitly.
pub fn package(output_root: &Path) -> Result<PathBuf, FlipbookError> {
    let name = output_root
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            FlipbookError::InvalidConfig(format!(
                "output directory '{}' has no usable name",
                output_root.display()
            ))
        })?;
    let archive_path = output_root
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(format!("{name}.zip"));

    let mut files = Vec::new();
    collect_files(output_root, &mut files).map_err(|e| FlipbookError::Packaging {
        path: output_root.to_path_buf(),
        detail: e.to_string(),
    })?;
    files.sort();

    let file = std::fs::File::create(&archive_path).map_err(|e| FlipbookError::Packaging {
        path: archive_path.clone(),
        detail: e.to_string(),
    })?;
    let mut writer = zip::ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for path in &files {
        let entry_name = entry_name(output_root, path).ok_or_else(|| FlipbookError::Packaging {
            path: path.clone(),
            detail: "path is not under the output root".to_string(),
        })?;
        let data = std::fs::read(path).map_err(|e| FlipbookError::Packaging {
            path: path.clone(),
            detail: e.to_string(),
        })?;
        writer
            .start_file(entry_name.as_str(), options)
            .and_then(|_| writer.write_all(&data).map_err(zip::result::ZipError::Io))
            .map_err(|e| FlipbookError::Packaging {
                path: archive_path.clone(),
                detail: format!("adding '{entry_name}': {e}"),
            })?;
        debug!("Archived {} ({} bytes)", entry_name, data.len());
    }

    writer.finish().map_err(|e| FlipbookError::Packaging {
        path: archive_path.clone(),
        detail: e.to_string(),
    })?;

    info!(
        "Packaged {} files into {}",
        files.len(),
        archive_path.display()
    );
    Ok(archive_path)
}

/// Depth-first walk collecting every regular file under `dir`.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

/// Relative archive entry name with forward slashes on every host.
fn entry_name(root: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn entry_names_use_forward_slashes() {
        let root = Path::new("/tmp/out");
        let file = root.join("assets").join("css").join("flipbook.css");
        assert_eq!(
            entry_name(root, &file).unwrap(),
            "assets/css/flipbook.css"
        );
    }

    #[test]
    fn archive_reproduces_tree_with_index_at_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("flipbook_output");
        write(&root, "index.html", "<html>");
        write(&root, "pages/page001.jpg", "jpeg-1");
        write(&root, "pages/page002.jpg", "jpeg-2");
        write(&root, "assets/css/flipbook.css", "css");
        write(&root, "assets/js/flipbook.js", "js");

        let archive_path = package(&root).unwrap();
        assert_eq!(archive_path, dir.path().join("flipbook_output.zip"));

        let file = std::fs::File::open(&archive_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        // Sorted by relative path, index.html at the archive's top level.
        assert_eq!(
            names,
            [
                "assets/css/flipbook.css",
                "assets/js/flipbook.js",
                "index.html",
                "pages/page001.jpg",
                "pages/page002.jpg",
            ]
        );

        use std::io::Read;
        let mut contents = String::new();
        archive
            .by_name("pages/page002.jpg")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "jpeg-2");
    }

    #[test]
    fn identical_trees_produce_identical_archives() {
        let dir = tempfile::tempdir().unwrap();
        for run in ["a", "b"] {
            let root = dir.path().join(run).join("book");
            write(&root, "index.html", "<html>");
            write(&root, "pages/page001.jpg", "jpeg-1");
            package(&root).unwrap();
        }
        let a = std::fs::read(dir.path().join("a/book.zip")).unwrap();
        let b = std::fs::read(dir.path().join("b/book.zip")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_root_is_a_packaging_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = package(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, FlipbookError::Packaging { .. }));
    }
}
