//! JSON output formatter for deduplication reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "inputs": [
//!     {
//!       "file": "/path/to/Bookmarks",
//!       "kind": "bookmarks",
//!       "status": "scanned",
//!       "groups": [
//!         {
//!           "folder_id": "1",
//!           "folder_name": "Bookmarks bar",
//!           "members": [
//!             { "role": "keep", "id": "2", "name": "A", "value": "http://a.com", "date_added": "2021-01-01T00:00:00Z" },
//!             { "role": "duplicate", "id": "3", "name": "A", "value": "https://a.com", "date_added": null }
//!           ]
//!         }
//!       ],
//!       "removed": 0,
//!       "unmatched": [],
//!       "clean_path": null,
//!       "backup_path": null,
//!       "error": null
//!     }
//!   ],
//!   "summary": {
//!     "inputs": 1,
//!     "failed": 0,
//!     "folders_scanned": 1,
//!     "leaves_scanned": 2,
//!     "duplicate_groups": 1,
//!     "entries_removed": 0,
//!     "unmatched_ids": 0,
//!     "exit_code": 0,
//!     "exit_code_name": "MD000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::{format_date_added, InputReport, InputStatus, RunSummary};
use crate::duplicates::{Comparator, DuplicateGroup, EntryKind};
use crate::error::ExitCode;

/// One group member in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMember {
    /// `keep` for the survivor, `duplicate` otherwise
    pub role: &'static str,
    /// Node id
    pub id: String,
    /// Display name
    pub name: String,
    /// Compared payload (URL or note content)
    pub value: Option<String>,
    /// `date_added` as RFC 3339 where possible
    pub date_added: Option<String>,
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonGroup {
    /// Id of the folder holding the group
    pub folder_id: String,
    /// Name of the folder holding the group
    pub folder_name: Option<String>,
    /// Members, survivor first
    pub members: Vec<JsonMember>,
}

impl JsonGroup {
    /// Convert a duplicate group.
    #[must_use]
    pub fn from_group(group: &DuplicateGroup, comparator: Comparator) -> Self {
        Self {
            folder_id: group.folder_id.clone(),
            folder_name: group.folder_name.clone(),
            members: group
                .members
                .iter()
                .enumerate()
                .map(|(position, node)| JsonMember {
                    role: if position == 0 { "keep" } else { "duplicate" },
                    id: node.id.clone(),
                    name: node.display_name().to_string(),
                    value: comparator.payload(node).map(str::to_string),
                    date_added: node.date_added.as_deref().map(format_date_added),
                })
                .collect(),
        }
    }
}

/// One input in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonInput {
    /// Input path
    pub file: String,
    /// Entry kind
    pub kind: EntryKind,
    /// Outcome
    pub status: InputStatus,
    /// Duplicate groups
    pub groups: Vec<JsonGroup>,
    /// Entries removed
    pub removed: usize,
    /// Selected ids not found while rewriting
    pub unmatched: Vec<String>,
    /// Cleaned file, if written
    pub clean_path: Option<String>,
    /// Backup file, if written
    pub backup_path: Option<String>,
    /// Error message, if the input failed
    pub error: Option<String>,
}

impl JsonInput {
    /// Convert an input report.
    #[must_use]
    pub fn from_report(report: &InputReport) -> Self {
        let comparator = Comparator::for_kind(report.kind);
        Self {
            file: report.path.to_string_lossy().into_owned(),
            kind: report.kind,
            status: report.status,
            groups: report
                .groups
                .iter()
                .map(|group| JsonGroup::from_group(group, comparator))
                .collect(),
            removed: report.removed,
            unmatched: report.unmatched.clone(),
            clean_path: report
                .clean_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            backup_path: report
                .backup_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            error: report.error.clone(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Run totals
    #[serde(flatten)]
    pub totals: RunSummary,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "MD000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Per-input results
    pub inputs: Vec<JsonInput>,
    /// Run summary
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a JSON output from input reports and the run's exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use markdupe::duplicates::EntryKind;
    /// use markdupe::error::ExitCode;
    /// use markdupe::output::{json::JsonOutput, InputReport};
    ///
    /// let reports = vec![InputReport::new("Bookmarks", EntryKind::Bookmarks)];
    /// let output = JsonOutput::new(&reports, ExitCode::NoDuplicates);
    ///
    /// assert_eq!(output.inputs.len(), 1);
    /// assert_eq!(output.summary.exit_code_name, "MD002");
    /// ```
    #[must_use]
    pub fn new(reports: &[InputReport], exit_code: ExitCode) -> Self {
        Self {
            inputs: reports.iter().map(JsonInput::from_report).collect(),
            summary: JsonSummary {
                totals: RunSummary::from_reports(reports),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
