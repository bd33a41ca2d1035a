//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2024-05-01T12:00:00Z",
//!   "sets": [
//!     {
//!       "size": 1024,
//!       "method": "digest_matched",
//!       "digest": "abc123...",
//!       "files": ["/path/to/a", "/path/to/b", "/path/to/c"]
//!     }
//!   ],
//!   "summary": {
//!     "files_scanned": 100,
//!     "duplicate_sets": 1,
//!     "reclaimable_bytes": 2048,
//!     "error_count": 0,
//!     "errors": [],
//!     "exit_code": 0,
//!     "exit_code_name": "TF000"
//!   }
//! }
//! ```
//!
//! The digest is present only for digest-matched sets.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::duplicates::{DuplicateSet, MatchMethod, ScanSummary};
use crate::error::ExitCode;

/// A single duplicate set in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateSet {
    /// File size in bytes
    pub size: u64,
    /// How the set was proven
    pub method: MatchMethod,
    /// Shared digest (hex) for digest-matched sets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Member paths
    pub files: Vec<String>,
}

impl From<&DuplicateSet> for JsonDuplicateSet {
    fn from(set: &DuplicateSet) -> Self {
        Self {
            size: set.size,
            method: set.method,
            digest: set.digest_hex(),
            files: set
                .files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// One non-fatal error in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFileError {
    /// Path the error refers to
    pub path: String,
    /// Error description
    pub message: String,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Traversal entries visited
    pub files_scanned: usize,
    /// Files that passed every filter
    pub candidates: usize,
    /// Size groups with two or more files
    pub size_groups: usize,
    /// Files that had to be read
    pub files_read: usize,
    /// Digest computations performed
    pub digests_computed: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_sets: usize,
    /// Redundant copies across all sets
    pub duplicate_files: usize,
    /// Bytes reclaimable by keeping one copy per set
    pub reclaimable_bytes: u64,
    /// Number of non-fatal errors
    pub error_count: usize,
    /// The non-fatal errors
    pub errors: Vec<JsonFileError>,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "TF000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            files_scanned: summary.files_scanned,
            candidates: summary.candidates,
            size_groups: summary.size_groups,
            files_read: summary.files_read,
            digests_computed: summary.digests_computed,
            duplicate_sets: summary.duplicate_sets,
            duplicate_files: summary.duplicate_files,
            reclaimable_bytes: summary.reclaimable_bytes,
            error_count: summary.error_count,
            errors: summary
                .errors
                .iter()
                .map(|e| JsonFileError {
                    path: e.path().to_string_lossy().into_owned(),
                    message: e.to_string(),
                })
                .collect(),
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Confirmed duplicate sets
    pub sets: Vec<JsonDuplicateSet>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate sets, summary and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use twinfind::duplicates::{DuplicateSet, ScanSummary};
    /// use twinfind::error::ExitCode;
    /// use twinfind::output::json::JsonOutput;
    /// use std::path::PathBuf;
    ///
    /// let sets = vec![DuplicateSet::compared_pair(
    ///     1024,
    ///     PathBuf::from("/file1.txt"),
    ///     PathBuf::from("/file2.txt"),
    /// )];
    /// let output = JsonOutput::new(&sets, &ScanSummary::default(), ExitCode::Success);
    /// assert_eq!(output.sets.len(), 1);
    /// ```
    #[must_use]
    pub fn new(sets: &[DuplicateSet], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            generated_at: Utc::now(),
            sets: sets.iter().map(JsonDuplicateSet::from).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
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
