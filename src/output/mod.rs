//! Output module for persisting contact records
//!
//! This module handles:
//! - The `ContactRecord` produced for each URL with contacts
//! - Append-only CSV persistence shared by all link workers
//! - Reading an existing output file back for summaries

mod csv_sink;
mod record;
pub mod stats;

pub use csv_sink::{read_records, CsvSink, CSV_HEADER};
pub use record::{ContactRecord, LIST_SEPARATOR};
pub use stats::{print_summary, summarize, OutputSummary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
