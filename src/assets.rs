//! Static viewer asset bundle: stylesheet, script, and the `index.html`
//! template that ties them to the extracted page images.
//!
//! The core pipeline treats the viewer as an opaque collaborator: all it
//! knows is "a set of CSS files, a set of JS files, an init snippet, and a
//! template that needs the ordered page-file list". Two bundles satisfy that
//! contract:
//!
//! * **Remote** — the StPageFlip library fetched from unpkg, giving the
//!   full page-turn animation.
//! * **Embedded** — a dependency-free fallback viewer compiled into the
//!   binary, used when fetching fails or the caller asked for offline mode.
//!
//! Either way the generated flipbook works from `file://` with no network.

use crate::config::AssetSource;
use std::time::Duration;
use tracing::{info, warn};

/// Pinned StPageFlip release. Bumping this requires re-checking the init
/// snippet against the library's API.
const PAGE_FLIP_VERSION: &str = "2.0.7";

/// One file destined for the layout's assets area.
#[derive(Debug, Clone)]
pub struct AssetFile {
    /// File name within `assets/css/` or `assets/js/`.
    pub name: String,
    pub contents: Vec<u8>,
}

impl AssetFile {
    fn new(name: &str, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.to_string(),
            contents: contents.into(),
        }
    }
}

/// The resolved viewer bundle handed to the layout builder.
#[derive(Debug, Clone)]
pub struct ViewerAssets {
    pub css: Vec<AssetFile>,
    pub js: Vec<AssetFile>,
    /// Inline `<script>` body that boots the viewer from the `pages` array.
    /// Bundle-specific: the remote and embedded viewers expose different APIs.
    init_script: &'static str,
}

impl ViewerAssets {
    /// The built-in fallback bundle; always available, no network.
    pub fn embedded() -> Self {
        Self {
            css: vec![AssetFile::new("flipbook.css", FALLBACK_CSS)],
            js: vec![AssetFile::new("flipbook.js", FALLBACK_JS)],
            init_script: FALLBACK_INIT,
        }
    }
}

/// Resolve the viewer bundle for this conversion.
///
/// Remote fetch failures are not terminal: the embedded bundle is the
/// documented substitute, so we log the reason and fall back.
pub async fn resolve(source: &AssetSource) -> ViewerAssets {
    match source {
        AssetSource::Embedded => ViewerAssets::embedded(),
        AssetSource::Remote { timeout_secs } => match fetch_remote(*timeout_secs).await {
            Ok(assets) => {
                info!("Fetched StPageFlip {} viewer bundle", PAGE_FLIP_VERSION);
                assets
            }
            Err(reason) => {
                warn!("Viewer bundle download failed ({reason}); using embedded fallback");
                ViewerAssets::embedded()
            }
        },
    }
}

/// Download the StPageFlip bundle from unpkg.
async fn fetch_remote(timeout_secs: u64) -> Result<ViewerAssets, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| e.to_string())?;

    let base = format!("https://unpkg.com/page-flip@{PAGE_FLIP_VERSION}/dist");
    let js = fetch_text(&client, &format!("{base}/js/page-flip.browser.js")).await?;
    let css = fetch_text(&client, &format!("{base}/css/page-flip.css")).await?;

    Ok(ViewerAssets {
        css: vec![AssetFile::new("page-flip.css", css)],
        js: vec![AssetFile::new("page-flip.js", js)],
        init_script: PAGE_FLIP_INIT,
    })
}

async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("{url}: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("{url}: HTTP {}", response.status()));
    }
    response.text().await.map_err(|e| format!("{url}: {e}"))
}

/// Render the entry-point document from the final page-file list.
///
/// `page_files` are bare names (`page001.jpg`, …); the template prefixes the
/// `pages/` area itself. The list is injected as a JSON array so filenames
/// can never break out of the script context.
pub fn render_index(title: &str, page_files: &[String], assets: &ViewerAssets) -> String {
    let page_paths: Vec<String> = page_files.iter().map(|f| format!("pages/{f}")).collect();
    // Vec<String> → JSON array is infallible.
    let pages_json = serde_json::to_string(&page_paths).unwrap_or_else(|_| "[]".to_string());

    let css_links: String = assets
        .css
        .iter()
        .map(|f| format!("    <link rel=\"stylesheet\" href=\"assets/css/{}\">\n", f.name))
        .collect();
    let js_tags: String = assets
        .js
        .iter()
        .map(|f| format!("    <script src=\"assets/js/{}\"></script>\n", f.name))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
{css_links}</head>
<body>
    <div class="flipbook-container">
        <div class="header">
            <h1>{title}</h1>
            <p>Navigate with arrow keys, swipe, or the buttons below</p>
        </div>
        <div id="flipbook-container"></div>
        <div class="footer">
            <p>Generated with pdf2flip</p>
        </div>
    </div>
{js_tags}    <script>
        document.addEventListener('DOMContentLoaded', function() {{
            const pages = {pages_json};
            const container = document.getElementById('flipbook-container');
{init}
        }});
    </script>
</body>
</html>
"#,
        title = html_escape(title),
        css_links = css_links,
        js_tags = js_tags,
        pages_json = pages_json,
        init = assets.init_script,
    )
}

/// Minimal escaping for the few places the title lands in HTML text.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ── Init snippets ─────────────────────────────────────────────────────────

const FALLBACK_INIT: &str = "            new SimpleFlipbook(container, pages);";

const PAGE_FLIP_INIT: &str = r#"            const flip = new St.PageFlip(container, {
                width: 550,
                height: 733,
                size: 'stretch',
                minWidth: 315,
                maxWidth: 1000,
                minHeight: 420,
                maxHeight: 1350,
                maxShadowOpacity: 0.5,
                showCover: true
            });
            flip.loadFromImages(pages);
            document.addEventListener('keydown', (e) => {
                if (e.key === 'ArrowLeft') flip.flipPrev();
                if (e.key === 'ArrowRight') flip.flipNext();
            });"#;

// ── Embedded fallback bundle ──────────────────────────────────────────────
// A single-page viewer with prev/next buttons, keyboard and swipe
// navigation, and a progress bar. No external dependencies.

const FALLBACK_CSS: &str = r#"* { box-sizing: border-box; }

body {
    margin: 0;
    padding: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
}

.flipbook-container {
    max-width: 1200px;
    margin: 0 auto;
    padding: 20px;
}

.header {
    text-align: center;
    color: white;
    margin-bottom: 30px;
}

.header h1 {
    margin: 0;
    font-size: 2.5em;
    text-shadow: 2px 2px 4px rgba(0,0,0,0.3);
}

.flipbook-wrapper {
    position: relative;
    background: white;
    border-radius: 15px;
    box-shadow: 0 20px 40px rgba(0,0,0,0.2);
    overflow: hidden;
}

.flipbook {
    position: relative;
    width: 100%;
    height: 70vh;
    min-height: 500px;
    display: flex;
    align-items: center;
    justify-content: center;
    background: #f8f9fa;
}

.page-container {
    position: relative;
    width: 90%;
    height: 90%;
    max-width: 800px;
    background: white;
    border-radius: 8px;
    box-shadow: 0 4px 20px rgba(0,0,0,0.1);
    overflow: hidden;
}

.page {
    width: 100%;
    height: 100%;
    display: none;
    align-items: center;
    justify-content: center;
}

.page.active { display: flex; }

.page img {
    max-width: 100%;
    max-height: 100%;
    object-fit: contain;
}

.controls {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 20px 30px;
    background: white;
    border-top: 1px solid #e9ecef;
}

.nav-btn {
    background: #667eea;
    color: white;
    border: none;
    padding: 12px 24px;
    border-radius: 25px;
    cursor: pointer;
    font-size: 16px;
}

.nav-btn:disabled {
    background: #ccc;
    cursor: not-allowed;
}

.page-info {
    display: flex;
    align-items: center;
    gap: 15px;
    color: #495057;
}

.progress-bar {
    width: 200px;
    height: 6px;
    background: #e9ecef;
    border-radius: 3px;
    overflow: hidden;
}

.progress-fill {
    height: 100%;
    background: #667eea;
    transition: width 0.3s ease;
}

.footer {
    text-align: center;
    color: white;
    margin-top: 30px;
    opacity: 0.8;
}
"#;

const FALLBACK_JS: &str = r#"class SimpleFlipbook {
    constructor(container, pages) {
        this.container = container;
        this.pages = pages;
        this.currentPage = 0;
        this.totalPages = pages.length;
        this.init();
    }

    init() {
        this.createHTML();
        this.bindEvents();
        this.updateDisplay();
    }

    createHTML() {
        this.container.innerHTML = `
            <div class="flipbook-wrapper">
                <div class="flipbook">
                    <div class="page-container">
                        ${this.pages.map((page, index) => `
                            <div class="page" data-page="${index}">
                                <img src="${page}" alt="Page ${index + 1}" loading="lazy" />
                            </div>
                        `).join('')}
                    </div>
                </div>
                <div class="controls">
                    <button class="nav-btn" id="prev-btn">&larr; Previous</button>
                    <div class="page-info">
                        <span id="current-page">1</span> / <span id="total-pages">${this.totalPages}</span>
                        <div class="progress-bar"><div class="progress-fill" id="progress-fill"></div></div>
                    </div>
                    <button class="nav-btn" id="next-btn">Next &rarr;</button>
                </div>
            </div>
        `;
    }

    bindEvents() {
        document.getElementById('prev-btn').addEventListener('click', () => this.prevPage());
        document.getElementById('next-btn').addEventListener('click', () => this.nextPage());

        document.addEventListener('keydown', (e) => {
            if (e.key === 'ArrowLeft') this.prevPage();
            if (e.key === 'ArrowRight') this.nextPage();
            if (e.key === 'Home') this.goToPage(0);
            if (e.key === 'End') this.goToPage(this.totalPages - 1);
        });

        let startX = 0;
        this.container.addEventListener('touchstart', (e) => {
            startX = e.touches[0].clientX;
        });
        this.container.addEventListener('touchend', (e) => {
            const diff = startX - e.changedTouches[0].clientX;
            if (Math.abs(diff) > 50) {
                diff > 0 ? this.nextPage() : this.prevPage();
            }
        });
    }

    nextPage() {
        if (this.currentPage < this.totalPages - 1) this.goToPage(this.currentPage + 1);
    }

    prevPage() {
        if (this.currentPage > 0) this.goToPage(this.currentPage - 1);
    }

    goToPage(index) {
        if (index < 0 || index >= this.totalPages) return;
        this.currentPage = index;
        this.updateDisplay();
    }

    updateDisplay() {
        document.querySelectorAll('.page[data-page]').forEach((page, index) => {
            page.classList.toggle('active', index === this.currentPage);
        });
        document.getElementById('current-page').textContent = this.currentPage + 1;
        document.getElementById('prev-btn').disabled = this.currentPage === 0;
        document.getElementById('next-btn').disabled = this.currentPage === this.totalPages - 1;
        const progress = ((this.currentPage + 1) / this.totalPages) * 100;
        document.getElementById('progress-fill').style.width = progress + '%';
    }
}
"#;
