use byline_scanner::LinkMatch;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One timestamp element and the author resolved for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// Position of the timestamp among the document's matches
    pub index: usize,
    pub datetime: Option<String>,
    /// `datetime` parsed as RFC 3339, when it is valid
    pub published_at: Option<DateTime<FixedOffset>>,
    pub text: String,
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matched: Option<LinkMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentScan {
    pub source: String,
    pub records: Vec<AuthorRecord>,
    pub scan_time: Duration,
    pub error: Option<String>,
}

impl DocumentScan {
    pub fn new(source: String) -> Self {
        Self {
            source,
            records: Vec::new(),
            scan_time: Duration::from_secs(0),
            error: None,
        }
    }

    pub fn with_error(source: String, error: String) -> Self {
        Self {
            source,
            records: Vec::new(),
            scan_time: Duration::from_secs(0),
            error: Some(error),
        }
    }

    pub fn resolved_count(&self) -> usize {
        self.records.iter().filter(|r| r.username.is_some()).count()
    }

    pub fn unresolved_count(&self) -> usize {
        self.records.len() - self.resolved_count()
    }
}
