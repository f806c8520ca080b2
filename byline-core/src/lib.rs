pub mod model;
pub mod report;
pub mod scan;

pub use model::{AuthorRecord, DocumentScan};
pub use scan::{DocumentSource, ScanOptions, execute_scan, scan_document};
