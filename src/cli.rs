//! Command-line interface definitions for twinfind.
//!
//! This module defines all CLI arguments using the clap derive API. Options
//! left unset fall back to the configuration file and environment (see
//! [`crate::config`]).
//!
//! # Example
//!
//! ```bash
//! # Scan two directories and a single file
//! twinfind ~/Pictures /mnt/backup/Pictures ~/cover.jpg
//!
//! # Skip version control metadata and anything under 1 MiB
//! twinfind --exclude '\.git' --exclude '\.svn' --min-size 1MiB ~/src
//!
//! # JSON output for scripting
//! twinfind --output json ~/Downloads
//!
//! # Paths beginning with a dash
//! twinfind -- -odd-folder-name
//! ```

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scanner::DigestAlgorithm;

/// Finds byte-identical files among the given files and folders.
///
/// Files are grouped by size first. Pairs of same-sized files are compared
/// directly; larger groups are matched by content digest. Nothing is ever
/// modified or deleted.
#[derive(Debug, Parser)]
#[command(name = "twinfind")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Files and folders to scan
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Skip paths matching this regex (can be specified multiple times)
    ///
    /// The pattern must match the end of a path after a separator, typically
    /// a file or folder name. Start it with '^' to match the whole path.
    /// Matching is case-insensitive.
    #[arg(short, long, value_name = "REGEX")]
    pub exclude: Vec<String>,

    /// Minimum file size to consider (e.g., 100, 1.5k, 1MiB)
    ///
    /// Supports suffixes: k, ki, m, mi, g, gi, t, ti, each optionally
    /// followed by 'b'. Fractions of a byte are rounded up.
    #[arg(short = 's', long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Digest algorithm for groups of three or more same-sized files
    #[arg(long, value_enum, value_name = "ALGORITHM")]
    pub digest: Option<DigestAlgorithm>,

    /// Read buffer size per file (e.g., 512KiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub buffer_size: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Read settings from this TOML file instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Do not show the progress line
    #[arg(long)]
    pub no_progress: bool,

    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress everything but results and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable sets, printed as they are found
    #[default]
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: k, ki, m, mi, g, gi, t, ti, each optionally followed
/// by b. Case-insensitive. Numbers without suffix are treated as bytes.
/// Fractional results are rounded up, so a minimum of "1.5" bytes means 2.
///
/// # Examples
///
/// ```
/// use twinfind::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1k").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("1.5").unwrap(), 2);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    if num_str.is_empty() {
        return Err(format!("Invalid number: '{s}'"));
    }
    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let unit = suffix.strip_suffix('B').unwrap_or(&suffix);
    let multiplier: f64 = match unit {
        "" => 1.0,
        "K" => 1e3,
        "KI" => 1024.0,
        "M" => 1e6,
        "MI" => 1024.0 * 1024.0,
        "G" => 1e9,
        "GI" => 1024.0 * 1024.0 * 1024.0,
        "T" => 1e12,
        "TI" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    let bytes = (num * multiplier).ceil();
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(format!("Size is too large: '{s}'"));
    }
    Ok(bytes as u64)
}
