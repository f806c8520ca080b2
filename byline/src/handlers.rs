use byline_core::report::{ReportFormat, generate_report};
use byline_core::scan::{DocumentSource, ScanOptions, ScanProgressCallback, execute_scan};
use byline_scanner::link::{LinkClassification, classify_href};
use byline_scanner::PostBoundary;
use clap::ArgMatches;
use colored::Colorize;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const STDIN_MARKER: &str = "-";

// Helper functions for resolve handler

/// Collect the documents to scan from positional args and/or a list file.
/// With neither, stdin is scanned.
pub fn load_source_paths(
    files: &[String],
    list_file: Option<&PathBuf>,
) -> Result<Vec<PathBuf>, String> {
    let mut paths = Vec::new();

    if let Some(list_file_path) = list_file {
        paths.extend(load_paths_from_file(list_file_path)?);
    }

    paths.extend(files.iter().filter_map(|f| parse_source_line(f)));

    if paths.is_empty() {
        paths.push(PathBuf::from(STDIN_MARKER));
    }

    Ok(paths)
}

/// Load and parse document paths from a newline-delimited file
pub fn load_paths_from_file(path: &Path) -> Result<Vec<PathBuf>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read list file {}: {}", path.display(), e))?;

    let paths: Vec<PathBuf> = content.lines().filter_map(parse_source_line).collect();

    if paths.is_empty() {
        return Err(format!("No documents listed in {}", path.display()));
    }

    Ok(paths)
}

/// Parse a single list entry, skipping blanks and `#` comments and expanding `~`
pub fn parse_source_line(line: &str) -> Option<PathBuf> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let expanded = shellexpand::tilde(line);
    Some(PathBuf::from(expanded.as_ref()))
}

/// Turn paths into scan sources, reading stdin for `-`
pub fn into_sources(paths: Vec<PathBuf>) -> Result<Vec<DocumentSource>, String> {
    let mut stdin_read = false;
    let mut sources = Vec::with_capacity(paths.len());

    for path in paths {
        if path.as_os_str() != STDIN_MARKER {
            sources.push(DocumentSource::Path(path));
            continue;
        }

        if stdin_read {
            return Err("stdin ('-') can only be scanned once".to_string());
        }
        stdin_read = true;

        let mut html = String::new();
        io::stdin()
            .read_to_string(&mut html)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        sources.push(DocumentSource::Inline {
            name: "<stdin>".to_string(),
            html,
        });
    }

    Ok(sources)
}

/// `--no-boundary` wins; otherwise the boundary attribute, optionally with a value
pub fn build_boundary(no_boundary: bool, attr: Option<&str>, value: Option<&str>) -> PostBoundary {
    if no_boundary {
        return PostBoundary::None;
    }

    match (attr, value) {
        (Some(attr), Some(value)) => PostBoundary::attribute_value(attr, value),
        (Some(attr), None) => PostBoundary::attribute(attr),
        (None, _) => PostBoundary::None,
    }
}

pub fn format_classification(href: &str, classification: &LinkClassification) -> String {
    match classification {
        LinkClassification::Profile(handle) => {
            format!("{} {} @{}", href, "profile".green().bold(), handle)
        }
        LinkClassification::Permalink(handle) => {
            format!("{} {} @{}", href, "permalink".cyan(), handle)
        }
        LinkClassification::Unrelated => format!("{} {}", href, "unrelated".dimmed()),
    }
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "byline".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("{}", "who actually wrote that post?".dimmed());
    eprintln!();
}

fn hosts_arg(args: &ArgMatches) -> Vec<String> {
    args.get_many::<String>("host")
        .map(|hosts| hosts.cloned().collect())
        .unwrap_or_default()
}

pub async fn handle_resolve(sub_matches: &ArgMatches, quiet: bool) {
    init_tracing();

    let files: Vec<String> = sub_matches
        .get_many::<String>("FILE")
        .map(|files| files.cloned().collect())
        .unwrap_or_default();
    let list_file = sub_matches.get_one::<PathBuf>("list-file");
    let threads = *sub_matches.get_one::<usize>("threads").unwrap_or(&4);
    let selector = sub_matches
        .get_one::<String>("selector")
        .cloned()
        .unwrap_or_else(|| "time".to_string());
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let boundary = build_boundary(
        sub_matches.get_flag("no-boundary"),
        sub_matches.get_one::<String>("boundary-attr").map(String::as_str),
        sub_matches.get_one::<String>("boundary-value").map(String::as_str),
    );

    let sources = match load_source_paths(&files, list_file).and_then(into_sources) {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    };

    info!("Resolving authors in {} document(s)", sources.len());
    debug!("Boundary {:?}, selector {}", boundary, selector);

    // Chatter goes to stderr so machine-readable reports can be piped
    let chatty = !quiet && format == ReportFormat::Text;
    if chatty {
        eprintln!("Scanning {} document(s)", sources.len());
        eprintln!("Workers: {}", threads);
        eprintln!("Timestamp selector: {}", selector);
        eprintln!("Post boundary: {:?}\n", boundary);
    }

    // Spinner on a terminal, one line per document otherwise
    let show_progress_bars = chatty && io::stderr().is_terminal();
    let progress_callback: Option<ScanProgressCallback> = if chatty && !show_progress_bars {
        Some(Arc::new(|msg: String| {
            eprintln!("{}", msg);
        }))
    } else {
        None
    };

    let options = ScanOptions {
        sources,
        threads,
        timestamp_selector: selector,
        boundary,
        allowed_hosts: hosts_arg(sub_matches),
        show_progress_bars,
    };

    let scans = match execute_scan(options, progress_callback).await {
        Ok(scans) => scans,
        Err(e) => {
            eprintln!("✗ Scan failed: {}", e);
            std::process::exit(1);
        }
    };

    if chatty {
        eprintln!("\n✓ Scan complete!\n");
    }

    print!("{}", generate_report(&scans, format));
}

pub fn handle_classify(sub_matches: &ArgMatches) {
    let hosts = hosts_arg(sub_matches);

    if let Some(hrefs) = sub_matches.get_many::<String>("HREF") {
        for href in hrefs {
            let classification = classify_href(href, &hosts);
            println!("{}", format_classification(href, &classification));
        }
    }
}
