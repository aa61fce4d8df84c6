//! Structured error handling and exit codes.

use serde::Serialize;

use crate::actions::PersistError;
use crate::tree::TreeError;

/// Exit codes for the markdupe application.
///
/// - 0: Success (duplicates were found, and removed for `clean`)
/// - 1: General error (every input failed, or the run could not start)
/// - 2: No duplicates found (completed normally, nothing to remove)
/// - 3: Partial success (some inputs failed, others were processed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: duplicates were found (and removed, for `clean`).
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: every input was processed and none had duplicates.
    NoDuplicates = 2,
    /// Partial success: some inputs failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "MD000",
            Self::GeneralError => "MD001",
            Self::NoDuplicates => "MD002",
            Self::PartialSuccess => "MD003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "MD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
    /// Error category: `malformed`, `parse`, `io` or `other`
    pub kind: &'static str,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            kind: error_kind(err),
        }
    }
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(tree) = cause.downcast_ref::<TreeError>() {
            return if tree.is_malformed() { "malformed" } else { "parse" };
        }
        if cause.downcast_ref::<PersistError>().is_some() {
            return "io";
        }
    }
    "other"
}
