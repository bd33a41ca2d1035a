//! Output formatters for duplicate scan results.
//!
//! - [`text`] for people, streamed as sets are found
//! - [`json`] for automation and scripting
//! - [`csv`] for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use twinfind::duplicates::DuplicateFinder;
//! use twinfind::error::ExitCode;
//! use twinfind::output::JsonOutput;
//! use std::path::PathBuf;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (sets, summary) = finder.find_duplicates_in_paths(vec![PathBuf::from(".")]).unwrap();
//!
//! let exit_code = ExitCode::for_scan(sets.len(), summary.error_count);
//! let output = JsonOutput::new(&sets, &summary, exit_code);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

pub use csv::CsvOutput;
pub use json::JsonOutput;
