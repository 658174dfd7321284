//! Exporter trait and error types
//!
//! This module defines the interface for writing the final records once the
//! crawl has drained.

use crate::property::PropertyRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to create output file {path}: {source}")]
    Create {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a crawl's records somewhere, exactly once
pub trait Exporter {
    /// Writes every record in order and returns how many were written
    fn export(&self, records: &[PropertyRecord]) -> OutputResult<usize>;
}
