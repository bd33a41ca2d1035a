//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the twinfind application.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: General error (bad arguments, unreadable root, broken config)
/// - 2: No duplicates found (completed normally, no duplicates)
/// - 3: Partial success (completed with some non-fatal file errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// General error: The run could not be started or finished.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Partial success: Scan completed but some files could not be read.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Pick the exit code for a completed scan.
    #[must_use]
    pub fn for_scan(duplicate_sets: usize, errors: usize) -> Self {
        if errors > 0 {
            Self::PartialSuccess
        } else if duplicate_sets > 0 {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }

    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "TF000",
            Self::GeneralError => "TF001",
            Self::NoDuplicates => "TF002",
            Self::PartialSuccess => "TF003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "TF001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
