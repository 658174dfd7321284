//! Output module for crawl results
//!
//! This module handles:
//! - Exporting the final records as CSV
//! - Recording and printing crawl statistics

mod csv_export;
pub mod stats;
mod traits;

pub use csv_export::{record_to_row, write_records, CsvExporter, CSV_HEADERS};
pub use stats::{print_summary, CrawlStats, CrawlSummary};
pub use traits::{Exporter, OutputError, OutputResult};
