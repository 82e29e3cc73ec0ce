//! External-tool strategy backed by poppler's `pdftoppm`.
//!
//! ## Why write to a staging directory?
//!
//! `pdftoppm` only writes files; it cannot stream images to stdout one page
//! at a time in a format we can split reliably. So this strategy points the
//! tool at a `tempfile::TempDir`, lets it emit `page-<n>.jpg` files, then
//! reads them back into memory — after which the result is indistinguishable
//! from a pure in-memory strategy. The `TempDir` cleans itself up on drop,
//! including on the error paths.
//!
//! ## Why poll the child instead of `wait()`?
//!
//! A plain `wait()` blocks forever if the tool hangs on a pathological PDF.
//! Polling `try_wait` against a deadline lets us kill the child and report
//! `Failed("timed out …")`, keeping the chain's own timeout as a backstop
//! rather than the only line of defence.

use crate::pipeline::strategy::{
    ExtractedPage, ExtractionResult, PageRasterizer, StrategyOutcome,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// How often the child process is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Rasterizes via the `pdftoppm` command-line tool (poppler-utils).
pub struct PdftoppmStrategy {
    executable: PathBuf,
    jpeg_quality: u8,
    /// Kill-on-deadline bound for the child process. `None` = unbounded.
    child_deadline: Option<Duration>,
}

impl PdftoppmStrategy {
    /// Strategy using `pdftoppm` from `PATH`.
    pub fn new(jpeg_quality: u8, deadline_secs: u64) -> Self {
        Self::with_executable("pdftoppm", jpeg_quality, deadline_secs)
    }

    /// Strategy using an explicit executable path (tests, non-PATH installs).
    pub fn with_executable(
        executable: impl Into<PathBuf>,
        jpeg_quality: u8,
        deadline_secs: u64,
    ) -> Self {
        Self {
            executable: executable.into(),
            jpeg_quality,
            child_deadline: (deadline_secs > 0).then(|| Duration::from_secs(deadline_secs)),
        }
    }

    /// Spawn the tool and wait for it, enforcing the deadline.
    ///
    /// Returns the tool's stderr on non-zero exit.
    fn run_tool(&self, source: &Path, stage_prefix: &Path, dpi: u32) -> Result<(), StrategyOutcome> {
        let mut child = match Command::new(&self.executable)
            .arg(source)
            .arg(stage_prefix)
            .arg("-jpeg")
            .arg("-jpegopt")
            .arg(format!("quality={}", self.jpeg_quality))
            .arg("-r")
            .arg(dpi.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StrategyOutcome::Unavailable(format!(
                    "'{}' not installed",
                    self.executable.display()
                )));
            }
            Err(e) => {
                return Err(StrategyOutcome::Failed(format!(
                    "failed to spawn '{}': {e}",
                    self.executable.display()
                )));
            }
        };

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if let Some(limit) = self.child_deadline {
                        if started.elapsed() >= limit {
                            let _ = child.kill();
                            let _ = child.wait();
                            return Err(StrategyOutcome::Failed(format!(
                                "timed out after {}s, process killed",
                                limit.as_secs()
                            )));
                        }
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(StrategyOutcome::Failed(format!(
                        "failed waiting for child: {e}"
                    )));
                }
            }
        };

        if !status.success() {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            let detail: String = stderr.trim().chars().take(200).collect();
            return Err(StrategyOutcome::Failed(format!(
                "exited with {status}: {detail}"
            )));
        }

        Ok(())
    }
}

impl PageRasterizer for PdftoppmStrategy {
    fn name(&self) -> &str {
        "pdftoppm"
    }

    fn extract(&self, source: &Path, dpi: u32) -> StrategyOutcome {
        if !source.is_file() {
            return StrategyOutcome::Failed(format!("source not found: {}", source.display()));
        }

        let stage = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => return StrategyOutcome::Failed(format!("staging dir: {e}")),
        };

        if let Err(outcome) = self.run_tool(source, &stage.path().join("page"), dpi) {
            return outcome;
        }

        let staged = match collect_staged_pages(stage.path()) {
            Ok(files) => files,
            Err(reason) => return StrategyOutcome::Failed(reason),
        };
        debug!("pdftoppm staged {} page files", staged.len());

        let mut pages = Vec::with_capacity(staged.len());
        for (i, file) in staged.iter().enumerate() {
            match std::fs::read(file) {
                Ok(bytes) => pages.push(ExtractedPage::new(i + 1, bytes)),
                Err(e) => {
                    return StrategyOutcome::Failed(format!(
                        "failed reading staged page '{}': {e}",
                        file.display()
                    ))
                }
            }
        }

        match ExtractionResult::new(pages) {
            Ok(result) => StrategyOutcome::Success(result),
            Err(reason) => StrategyOutcome::Failed(reason),
        }
    }
}

/// List the `page-<n>.jpg` files the tool wrote, sorted by page number.
///
/// pdftoppm zero-pads its numeric suffix to the width of the last page, but
/// sorting numerically (not lexicographically) keeps this independent of the
/// tool's padding behaviour across poppler versions.
fn collect_staged_pages(stage: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(stage).map_err(|e| format!("reading staging dir: {e}"))?;

    let mut numbered: Vec<(u32, PathBuf)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("reading staging dir: {e}"))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(number) = name
            .strip_prefix("page-")
            .and_then(|rest| rest.strip_suffix(".jpg"))
            .and_then(|n| n.parse::<u32>().ok())
        else {
            continue;
        };
        numbered.push((number, path));
    }

    if numbered.is_empty() {
        return Err("produced zero pages".to_string());
    }

    numbered.sort_by_key(|(n, _)| *n);
    Ok(numbered.into_iter().map(|(_, p)| p).collect())
}
