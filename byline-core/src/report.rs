// Report generation from scan results

use crate::model::DocumentScan;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "csv" => Some(ReportFormat::Csv),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub documents: usize,
    pub failed_documents: usize,
    pub timestamps: usize,
    pub resolved: usize,
    pub unresolved: usize,
    /// (username, timestamp count), most frequent first
    pub authors: Vec<(String, usize)>,
}

impl ScanSummary {
    pub fn from_scans(scans: &[DocumentScan]) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in scans.iter().flat_map(|s| s.records.iter()) {
            if let Some(ref username) = record.username {
                *counts.entry(username.as_str()).or_default() += 1;
            }
        }

        let mut authors: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        authors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let timestamps: usize = scans.iter().map(|s| s.records.len()).sum();
        let resolved: usize = scans.iter().map(|s| s.resolved_count()).sum();

        Self {
            documents: scans.len(),
            failed_documents: scans.iter().filter(|s| s.error.is_some()).count(),
            timestamps,
            resolved,
            unresolved: timestamps - resolved,
            authors,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: ScanSummary,
    documents: &'a [DocumentScan],
}

pub fn generate_report(scans: &[DocumentScan], format: ReportFormat) -> String {
    match format {
        ReportFormat::Text => generate_scan_report(scans),
        ReportFormat::Json => generate_json_report(scans),
        ReportFormat::Csv => generate_csv_report(scans),
    }
}

/// Human-readable summary plus a per-document listing
pub fn generate_scan_report(scans: &[DocumentScan]) -> String {
    let summary = ScanSummary::from_scans(scans);

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Documents scanned: {}\n", summary.documents));
    if summary.failed_documents > 0 {
        report.push_str(&format!(
            "  Documents failed: {}\n",
            summary.failed_documents.to_string().red()
        ));
    }
    report.push_str(&format!("  Timestamps found: {}\n", summary.timestamps));
    report.push_str(&format!("  Authors resolved: {}\n", summary.resolved));
    report.push_str(&format!("  Unresolved: {}\n", summary.unresolved));

    if !summary.authors.is_empty() {
        report.push_str("\n# Authors:\n");
        for (username, count) in &summary.authors {
            report.push_str(&format!("  @{} ({})\n", username.bright_white(), count));
        }
    }

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    for scan in scans {
        report.push_str(&format!("## {}\n", scan.source));

        if let Some(ref error) = scan.error {
            report.push_str(&format!("  {} {}\n\n", "✗".red().bold(), error));
            continue;
        }

        report.push_str(&format!("  {} timestamps\n\n", scan.records.len()));

        for record in &scan.records {
            let author = match record.username {
                Some(ref username) => format!("@{}", username).green().to_string(),
                None => "unknown".yellow().to_string(),
            };

            let mut line = format!("  #{} {}", record.index, author);

            if let Some(ref datetime) = record.datetime {
                line.push_str(&format!(" {}", datetime.dimmed()));
            }
            if !record.text.is_empty() {
                line.push_str(&format!(" \"{}\"", record.text));
            }
            if let Some(ref matched) = record.matched {
                line.push_str(&format!(" {}", format!("via {}", matched.href).dimmed()));
            }

            report.push_str(&line);
            report.push('\n');
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(scans: &[DocumentScan]) -> String {
    let report = JsonReport {
        summary: ScanSummary::from_scans(scans),
        documents: scans,
    };
    serde_json::to_string_pretty(&report).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

/// One row per timestamp
pub fn generate_csv_report(scans: &[DocumentScan]) -> String {
    let mut csv = String::from("source,index,datetime,username,href,level\n");

    for scan in scans {
        for record in &scan.records {
            let (href, level) = match record.matched {
                Some(ref m) => (m.href.as_str(), m.level.to_string()),
                None => ("", String::new()),
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                csv_field(&scan.source),
                record.index,
                csv_field(record.datetime.as_deref().unwrap_or("")),
                csv_field(record.username.as_deref().unwrap_or("")),
                csv_field(href),
                level
            ));
        }
    }

    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
