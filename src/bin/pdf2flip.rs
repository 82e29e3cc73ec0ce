//! CLI binary for pdf2flip.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2flip::{
    convert, AssetSource, ConversionConfig, ConversionProgressCallback, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a spinner while a strategy renders the
/// document, switching to a page-count bar while the layout is written.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Rasterizing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_strategy_start(&self, name: &str) {
        self.bar.set_message(format!("via {name}…"));
    }

    fn on_strategy_failed(&self, name: &str, reason: &str) {
        self.bar
            .println(format!("  {} {name}: {reason}", dim("↪ skipped")));
    }

    fn on_pages_extracted(&self, strategy: &str, total: usize) {
        self.bar.println(format!(
            "  {} {} pages rendered via {}",
            green("✓"),
            total,
            bold(strategy)
        ));
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        self.bar.set_style(style);
        self.bar.set_prefix("Writing");
        self.bar.set_length(total as u64);
    }

    fn on_page_written(&self, _page_num: usize, _total: usize) {
        self.bar.inc(1);
    }

    fn on_archive_written(&self, _bytes: u64) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion
  pdf2flip document.pdf

  # Custom output directory and resolution
  pdf2flip document.pdf --output my_book --dpi 150

  # Fully offline: skip the viewer bundle download
  pdf2flip --offline document.pdf

  # Machine-readable result
  pdf2flip --json document.pdf

RASTERIZATION:
  Strategies are tried in order until one succeeds:
    1. pdftoppm  (poppler-utils; external tool, fastest when present)
    2. pdfium    (bundled/system shared library)

  Install poppler for the fast path:
    macOS:  brew install poppler
    Ubuntu: sudo apt-get install poppler-utils

OUTPUT:
  <output>/            viewer directory (open index.html in a browser)
  <output>.zip         the same tree, ready to share
"#;

/// Convert a PDF into a self-contained, offline HTML5 flipbook.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2flip",
    version,
    about = "Convert a PDF into a self-contained, offline HTML5 flipbook",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the PDF file.
    input: PathBuf,

    /// Output directory name; the archive lands next to it as <dir>.zip.
    #[arg(short, long, env = "PDF2FLIP_OUTPUT", default_value = "flipbook_output")]
    output: PathBuf,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2FLIP_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// JPEG quality for page images (1–100).
    #[arg(long, env = "PDF2FLIP_QUALITY", default_value_t = 95,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Viewer title.
    #[arg(long, env = "PDF2FLIP_TITLE", default_value = "PDF Flipbook")]
    title: String,

    /// Use the embedded viewer bundle; never touch the network.
    #[arg(long, env = "PDF2FLIP_OFFLINE")]
    offline: bool,

    /// Viewer bundle download timeout in seconds.
    #[arg(long, env = "PDF2FLIP_ASSET_TIMEOUT", default_value_t = 30)]
    asset_timeout: u64,

    /// Per-strategy attempt timeout in seconds (0 = unbounded).
    #[arg(long, env = "PDF2FLIP_STRATEGY_TIMEOUT", default_value_t = 120)]
    strategy_timeout: u64,

    /// Output the conversion result as JSON on stdout.
    #[arg(long, env = "PDF2FLIP_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2FLIP_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2FLIP_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2FLIP_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress: Option<ProgressCallback> = show_progress.then(|| {
        CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>
    });

    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .output_dir(&cli.output)
        .jpeg_quality(cli.quality)
        .title(&cli.title)
        .strategy_timeout_secs(cli.strategy_timeout)
        .assets(if cli.offline {
            AssetSource::Embedded
        } else {
            AssetSource::Remote {
                timeout_secs: cli.asset_timeout,
            }
        });
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert(&cli.input, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{} {} pages  {}ms  via {}",
            green("✔"),
            bold(&output.page_count.to_string()),
            output.stats.total_ms,
            output.strategy,
        );
        eprintln!(
            "  {} {}",
            cyan("dir:"),
            output.output_dir.display()
        );
        eprintln!(
            "  {} {}  {}",
            cyan("zip:"),
            output.archive_path.display(),
            dim(&format!("{} bytes", output.stats.archive_bytes)),
        );
        eprintln!(
            "  open {} in a browser",
            bold(&output.output_dir.join("index.html").display().to_string())
        );
    }

    Ok(())
}
