//! Statistics over an existing output file
//!
//! This module provides functionality for summarizing and displaying
//! what previous runs have appended to the CSV file.

use crate::output::{read_records, ContactRecord, OutputResult};
use crate::url::{extract_domain, parse_candidate_url};
use std::collections::HashSet;
use std::path::Path;

/// Summary of the records in an output file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSummary {
    /// Number of data rows
    pub total_records: usize,

    /// Number of distinct domains among the record URLs
    pub unique_domains: usize,

    /// Number of distinct postal codes with at least one record
    pub postal_codes: usize,

    /// Phone numbers across all rows
    pub phone_numbers: usize,

    /// Email addresses across all rows
    pub email_addresses: usize,
}

impl OutputSummary {
    /// Builds a summary from already loaded records
    pub fn from_records(records: &[ContactRecord]) -> Self {
        let domains: HashSet<String> = records
            .iter()
            .filter_map(|r| parse_candidate_url(&r.url).ok())
            .filter_map(|url| extract_domain(&url))
            .collect();
        let postal_codes: HashSet<&str> = records.iter().map(|r| r.postal_code.as_str()).collect();

        Self {
            total_records: records.len(),
            unique_domains: domains.len(),
            postal_codes: postal_codes.len(),
            phone_numbers: records.iter().map(|r| r.phone_numbers.len()).sum(),
            email_addresses: records.iter().map(|r| r.email_addresses.len()).sum(),
        }
    }
}

/// Loads an output file and summarizes it
///
/// # Returns
///
/// * `Ok(OutputSummary)` - Summary of the file's rows
/// * `Err(OutputError)` - The file could not be read
pub fn summarize(path: &Path) -> OutputResult<OutputSummary> {
    let records = read_records(path)?;
    Ok(OutputSummary::from_records(&records))
}

/// Prints a summary to stdout
pub fn print_summary(summary: &OutputSummary) {
    println!("=== Contact-Harvest Output ===\n");
    println!("Records: {}", summary.total_records);
    println!("Unique domains: {}", summary.unique_domains);
    println!("Postal codes covered: {}", summary.postal_codes);
    println!("Phone numbers: {}", summary.phone_numbers);
    println!("Email addresses: {}", summary.email_addresses);
}
