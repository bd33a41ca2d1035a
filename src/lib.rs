//! twinfind - duplicate file finder
//!
//! Walks one or more directory trees, groups regular files by size and
//! proves equality inside each group: pairs by a lockstep byte comparison,
//! larger groups by content digest. Symbolic-link cycles and overlapping
//! roots never cause a file to be visited twice.
//!
//! The library half exposes the pipeline ([`duplicates::DuplicateFinder`])
//! and its building blocks; [`run_app`] is what the binary calls.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{text, CsvOutput, JsonOutput};
use crate::progress::Progress;

/// Run a full scan as described by the parsed command line.
///
/// # Errors
///
/// Returns an error for fatal problems only: broken configuration, an
/// invalid exclusion pattern, an unusable root, or a failure to write the
/// results. Unreadable files inside the trees are counted in the summary.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = Config::load(&cli)?;
    log::debug!("Effective configuration: {:?}", config);

    let hidden = cli.quiet || cli.no_progress || !std::io::stderr().is_terminal();
    let progress = Arc::new(Progress::new(hidden, config.output == OutputFormat::Text));

    let finder_config = FinderConfig::default()
        .with_min_size(config.min_size)
        .with_exclude_patterns(&config.exclude)?
        .with_digest(config.digest)
        .with_buffer_size(config.buffer_size)
        .with_progress_interval(Duration::from_millis(config.progress_interval_ms))
        .with_progress_callback(progress.clone());

    let finder = DuplicateFinder::new(finder_config);
    let result = finder.find_duplicates_in_paths(cli.paths);
    progress.finish();
    let (sets, summary) = result?;

    let exit_code = ExitCode::for_scan(sets.len(), summary.error_count);

    let mut stdout = std::io::stdout().lock();
    match config.output {
        OutputFormat::Text => {}
        OutputFormat::Json => JsonOutput::new(&sets, &summary, exit_code)
            .write_to(&mut stdout)
            .context("Failed to write JSON output")?,
        OutputFormat::Csv => CsvOutput::new(&sets)
            .write_to(&mut stdout)
            .context("Failed to write CSV output")?,
    }
    stdout.flush().context("Failed to flush output")?;

    if !cli.quiet {
        text::write_summary(&mut std::io::stderr().lock(), &summary)
            .context("Failed to write summary")?;
    }

    Ok(exit_code)
}
