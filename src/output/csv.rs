//! CSV output formatter for deduplication reports.
//!
//! One row is generated for each member of each duplicate group.
//!
//! # Columns
//!
//! - `file`: Input path the group was found in
//! - `group_id`: Group number, starting at 1 for each input
//! - `role`: `keep` for the survivor, `duplicate` otherwise
//! - `id`: Node id
//! - `name`: Entry name, empty when unset
//! - `url`: Compared payload (the URL, or the text of a note)
//! - `date_added`: RFC 3339 when the stored timestamp can be converted
//!
//! # Example
//!
//! ```no_run
//! use markdupe::output::{csv::CsvOutput, InputReport};
//!
//! let reports: Vec<InputReport> = Vec::new();
//! CsvOutput::new(&reports).write_to(std::io::stdout()).unwrap();
//! ```

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::{format_date_added, InputReport};
use crate::duplicates::Comparator;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    file: &'a str,
    group_id: usize,
    role: &'static str,
    id: &'a str,
    name: &'a str,
    url: &'a str,
    date_added: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    reports: &'a [InputReport],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(reports: &'a [InputReport]) -> Self {
        Self { reports }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let mut wrote_row = false;

        for report in self.reports {
            let file = report.path.to_string_lossy();
            let comparator = Comparator::for_kind(report.kind);

            for (idx, group) in report.groups.iter().enumerate() {
                for (position, node) in group.members.iter().enumerate() {
                    csv_writer.serialize(CsvRow {
                        file: &file,
                        group_id: idx + 1,
                        role: if position == 0 { "keep" } else { "duplicate" },
                        id: &node.id,
                        name: node.name.as_deref().unwrap_or_default(),
                        url: comparator.payload(node).unwrap_or_default(),
                        date_added: node
                            .date_added
                            .as_deref()
                            .map(format_date_added)
                            .unwrap_or_default(),
                    })?;
                    wrote_row = true;
                }
            }
        }

        if !wrote_row {
            csv_writer.write_record(["file", "group_id", "role", "id", "name", "url", "date_added"])?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
