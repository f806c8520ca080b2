use crate::model::{AuthorRecord, DocumentScan};
use byline_scanner::error::{ResolveError, Result};
use byline_scanner::{AuthorResolver, PostBoundary};
use chrono::DateTime;
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::{ElementRef, Html, Selector};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const DEFAULT_TIMESTAMP_SELECTOR: &str = "time";

/// Where a document's markup comes from
#[derive(Debug, Clone)]
pub enum DocumentSource {
    Path(PathBuf),
    Inline { name: String, html: String },
}

impl DocumentSource {
    pub fn name(&self) -> String {
        match self {
            DocumentSource::Path(path) => path.display().to_string(),
            DocumentSource::Inline { name, .. } => name.clone(),
        }
    }
}

/// Options for configuring a scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub sources: Vec<DocumentSource>,
    pub threads: usize,
    pub timestamp_selector: String,
    pub boundary: PostBoundary,
    pub allowed_hosts: Vec<String>,
    pub show_progress_bars: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            threads: 4,
            timestamp_selector: DEFAULT_TIMESTAMP_SELECTOR.to_string(),
            boundary: PostBoundary::threads(),
            allowed_hosts: Vec::new(),
            show_progress_bars: false,
        }
    }
}

impl ScanOptions {
    pub fn resolver(&self) -> AuthorResolver {
        AuthorResolver::new()
            .with_boundary(self.boundary.clone())
            .with_allowed_hosts(self.allowed_hosts.clone())
    }
}

/// Callback for reporting scan progress
pub type ScanProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ResolveError::InvalidSelector(format!("{}: {:?}", css, e)))
}

/// Resolve the author of every timestamp element in `html`.
pub fn scan_document(
    html: &str,
    timestamp_selector: &str,
    resolver: &AuthorResolver,
) -> Result<Vec<AuthorRecord>> {
    let selector = parse_selector(timestamp_selector)?;
    let document = Html::parse_document(html);

    let mut records = Vec::new();
    for (index, element) in document.select(&selector).enumerate() {
        let resolution = resolver.resolve_author(element)?;
        let datetime = element.value().attr("datetime").map(str::to_string);
        let published_at = datetime
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok());

        debug!(
            "Timestamp {} ({:?}) resolved to {:?}",
            index, datetime, resolution.username
        );

        records.push(AuthorRecord {
            index,
            datetime,
            published_at,
            text: visible_text(&element),
            username: resolution.username,
            matched: resolution.matched,
        });
    }

    Ok(records)
}

fn visible_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scan every source in `options`, at most `threads` at a time.
/// Results come back in source order.
pub async fn execute_scan(
    options: ScanOptions,
    progress_callback: Option<ScanProgressCallback>,
) -> std::result::Result<Vec<DocumentScan>, String> {
    if options.sources.is_empty() {
        return Err("No documents to scan".to_string());
    }

    // Fail once up front rather than once per document
    parse_selector(&options.timestamp_selector).map_err(|e| e.to_string())?;

    let ScanOptions {
        sources,
        threads,
        timestamp_selector,
        show_progress_bars,
        ..
    } = options.clone();
    let resolver = Arc::new(options.resolver());
    let timestamp_selector = Arc::new(timestamp_selector);
    let threads = threads.max(1);
    let total = sources.len();

    info!("Scanning {} document(s) with {} workers", total, threads);

    let progress_bar = if show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .map_err(|e| e.to_string())?,
        );
        pb.set_message("Starting scan...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let mut scans: Vec<(usize, DocumentScan)> = stream::iter(sources.into_iter().enumerate())
        .map(|(idx, source)| {
            let resolver = resolver.clone();
            let timestamp_selector = timestamp_selector.clone();
            let progress_bar = progress_bar.clone();
            let progress_callback = progress_callback.clone();
            let processed_count = processed_count.clone();

            async move {
                let scan = scan_source(source, timestamp_selector, resolver).await;
                let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;

                if let Some(ref pb) = progress_bar {
                    pb.set_message(format!("Scanning... {}/{} documents", count, total));
                    pb.tick();
                }
                if let Some(ref callback) = progress_callback {
                    match scan.error {
                        Some(ref e) => callback(format!("[!] {}: {}", scan.source, e)),
                        None => callback(format!(
                            "{}: {} timestamp(s), {} resolved",
                            scan.source,
                            scan.records.len(),
                            scan.resolved_count()
                        )),
                    }
                }

                (idx, scan)
            }
        })
        .buffer_unordered(threads)
        .collect()
        .await;

    scans.sort_by_key(|(idx, _)| *idx);

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!("Scan complete! {} documents processed", total));
    }

    info!("Scan complete. Processed {} documents", total);
    Ok(scans.into_iter().map(|(_, scan)| scan).collect())
}

async fn scan_source(
    source: DocumentSource,
    timestamp_selector: Arc<String>,
    resolver: Arc<AuthorResolver>,
) -> DocumentScan {
    let name = source.name();
    let start = Instant::now();

    let html = match source {
        DocumentSource::Path(path) => match tokio::fs::read_to_string(&path).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to read {}: {}", name, e);
                return DocumentScan::with_error(name, ResolveError::from(e).to_string());
            }
        },
        DocumentSource::Inline { html, .. } => html,
    };

    // The parsed tree is not Send, so parse and resolve on one blocking thread
    let joined = tokio::task::spawn_blocking(move || {
        scan_document(&html, &timestamp_selector, &resolver)
    })
    .await;

    match joined {
        Ok(Ok(records)) => {
            let mut scan = DocumentScan::new(name);
            scan.records = records;
            scan.scan_time = start.elapsed();
            scan
        }
        Ok(Err(e)) => {
            warn!("Failed to scan {}: {}", name, e);
            DocumentScan::with_error(name, e.to_string())
        }
        Err(e) => {
            warn!("Scan task for {} failed: {}", name, e);
            DocumentScan::with_error(name, format!("Scan task failed: {}", e))
        }
    }
}
