// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    build_boundary, format_classification, load_source_paths, parse_source_line,
};

// Re-export scan functionality from byline-core
pub use byline_core::report::{ReportFormat, generate_report};
pub use byline_core::scan::{DocumentSource, ScanOptions, execute_scan};
