//! Append-only CSV sink shared by all link workers

use crate::output::record::{ContactRecord, CsvRow};
use crate::output::{OutputError, OutputResult};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Column order of the output file
pub const CSV_HEADER: [&str; 5] = [
    "url",
    "commune",
    "postal_code",
    "phone_numbers",
    "email_addresses",
];

/// Durable, append-only writer of contact records
///
/// Every append runs one critical section: check whether the file already
/// has content, write the header if it does not, then write the row and
/// flush. Rows from concurrent writers never interleave and the header is
/// written exactly once, also across process restarts.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvSink {
    /// Creates a sink writing to `path`; nothing is touched until the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, writing the header first if the file is new
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The row is flushed to the file
    /// * `Err(OutputError)` - The file could not be opened or written
    pub fn append(&self, record: &ContactRecord) -> OutputResult<()> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let needs_header = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record(CSV_HEADER)
                .map_err(|e| self.write_error(e))?;
            tracing::debug!("Wrote CSV header to {}", self.path.display());
        }

        writer
            .serialize(record.to_row())
            .map_err(|e| self.write_error(e))?;
        writer.flush()?;

        Ok(())
    }

    fn write_error(&self, error: csv::Error) -> OutputError {
        OutputError::Write {
            path: self.path.display().to_string(),
            message: error.to_string(),
        }
    }
}

/// Reads every record of an existing output file
///
/// # Returns
///
/// * `Ok(Vec<ContactRecord>)` - Records in file order
/// * `Err(OutputError)` - The file is missing or a row is malformed
pub fn read_records(path: &Path) -> OutputResult<Vec<ContactRecord>> {
    let read_error = |e: csv::Error| OutputError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::Reader::from_path(path).map_err(read_error)?;
    let mut records = Vec::new();

    for row in reader.deserialize::<CsvRow>() {
        records.push(ContactRecord::from_row(row.map_err(read_error)?));
    }

    Ok(records)
}
