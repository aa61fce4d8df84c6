//! Reports and output formatters for deduplication runs.
//!
//! Each processed input produces an [`InputReport`]; a [`RunSummary`] totals
//! them. The formatters render reports for humans or scripts:
//! - Coloured text for the terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use markdupe::error::ExitCode;
//! use markdupe::output::{json::JsonOutput, InputReport};
//!
//! let reports: Vec<InputReport> = Vec::new();
//! let output = JsonOutput::new(&reports, ExitCode::NoDuplicates);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateGroup, EntryKind, FinderStats};

pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;

/// Seconds between 1601-01-01 and 1970-01-01.
const WEBKIT_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;

/// Render a `date_added` value as RFC 3339.
///
/// Browsers store microseconds since 1601-01-01 UTC as a decimal string.
/// Values that are not a positive integer, or fall outside chrono's range,
/// are returned unchanged.
///
/// # Example
///
/// ```
/// use markdupe::output::format_date_added;
///
/// assert_eq!(format_date_added("13253932800000000"), "2021-01-01T00:00:00Z");
/// assert_eq!(format_date_added("yesterday"), "yesterday");
/// ```
#[must_use]
pub fn format_date_added(raw: &str) -> String {
    let Ok(micros) = raw.trim().parse::<i64>() else {
        return raw.to_string();
    };
    if micros <= 0 {
        return raw.to_string();
    }

    micros
        .checked_sub(WEBKIT_EPOCH_OFFSET_SECS * 1_000_000)
        .and_then(DateTime::<Utc>::from_timestamp_micros)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| raw.to_string())
}

/// What happened to one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputStatus {
    /// Duplicates were found and reported, nothing was written.
    Scanned,
    /// Duplicates were removed and the cleaned file written.
    Cleaned,
    /// Duplicates would have been removed (`--dry-run`).
    DryRun,
    /// Nothing to remove.
    NoDuplicates,
    /// The input could not be processed.
    Failed,
}

/// Result of processing one input file.
#[derive(Debug, Clone, Serialize)]
pub struct InputReport {
    /// The input path.
    pub path: PathBuf,
    /// Kind of entries deduplicated.
    pub kind: EntryKind,
    /// Outcome.
    pub status: InputStatus,
    /// Duplicate groups found.
    pub groups: Vec<DuplicateGroup>,
    /// Finder statistics.
    pub stats: FinderStats,
    /// Entries removed (or that would be removed in a dry run).
    pub removed: usize,
    /// Selected ids that were not found while rewriting.
    pub unmatched: Vec<String>,
    /// Path of the cleaned file, when one was written.
    pub clean_path: Option<PathBuf>,
    /// Path of the backup, when one was written.
    pub backup_path: Option<PathBuf>,
    /// Error message for failed inputs.
    pub error: Option<String>,
}

impl InputReport {
    /// Start a report for an input.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
            status: InputStatus::NoDuplicates,
            groups: Vec::new(),
            stats: FinderStats::default(),
            removed: 0,
            unmatched: Vec::new(),
            clean_path: None,
            backup_path: None,
            error: None,
        }
    }

    /// Report for an input that failed.
    #[must_use]
    pub fn failed(path: impl Into<PathBuf>, kind: EntryKind, error: &anyhow::Error) -> Self {
        let mut report = Self::new(path, kind);
        report.status = InputStatus::Failed;
        report.error = Some(format!("{error:#}"));
        report
    }

    /// Whether this input failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == InputStatus::Failed
    }
}

/// Totals over all inputs of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Inputs processed.
    pub inputs: usize,
    /// Inputs that failed.
    pub failed: usize,
    /// Folders inspected.
    pub folders_scanned: usize,
    /// Leaves inspected.
    pub leaves_scanned: usize,
    /// Duplicate groups found.
    pub duplicate_groups: usize,
    /// Entries removed (or that would be removed).
    pub entries_removed: usize,
    /// Selected ids not found while rewriting.
    pub unmatched_ids: usize,
}

impl RunSummary {
    /// Total the given reports.
    #[must_use]
    pub fn from_reports(reports: &[InputReport]) -> Self {
        let mut stats = FinderStats::default();
        let mut summary = Self {
            inputs: reports.len(),
            ..Self::default()
        };

        for report in reports {
            stats.merge(&report.stats);
            summary.entries_removed += report.removed;
            summary.unmatched_ids += report.unmatched.len();
            if report.is_failed() {
                summary.failed += 1;
            }
        }

        summary.folders_scanned = stats.folders_scanned;
        summary.leaves_scanned = stats.leaves_scanned;
        summary.duplicate_groups = stats.duplicate_groups;
        summary
    }
}
