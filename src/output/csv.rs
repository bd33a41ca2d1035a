//! CSV output formatter for duplicate scan results.
//!
//! One row per file, with columns:
//! `set_id,method,size,path`
//!
//! Files from the same set share a `set_id`, numbered from 1 in output order.

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateSet, MatchMethod};

/// A single row in CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    set_id: usize,
    method: MatchMethod,
    size: u64,
    path: std::borrow::Cow<'a, str>,
}

/// CSV output formatter.
#[derive(Debug)]
pub struct CsvOutput<'a> {
    sets: &'a [DuplicateSet],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output from duplicate sets.
    #[must_use]
    pub fn new(sets: &'a [DuplicateSet]) -> Self {
        Self { sets }
    }

    /// Write CSV, including the header row, to the given writer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(["set_id", "method", "size", "path"])?;

        for (index, set) in self.sets.iter().enumerate() {
            for path in &set.files {
                wtr.serialize(CsvRow {
                    set_id: index + 1,
                    method: set.method,
                    size: set.size,
                    path: path.to_string_lossy(),
                })?;
            }
        }

        wtr.flush()?;
        Ok(())
    }

    /// Render to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| CsvOutputError::Io(std::io::Error::other(e)))
    }
}

/// Errors that can occur during CSV output.
#[derive(thiserror::Error, Debug)]
pub enum CsvOutputError {
    /// I/O error during writing
    #[error("I/O error during CSV generation: {0}")]
    Io(#[from] std::io::Error),

    /// CSV library error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
