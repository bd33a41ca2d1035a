//! Logging setup for twinfind.
//!
//! Diagnostics go through the `log` facade to stderr via `env_logger`.
//! Results go to stdout and never through the logger, so `-v` can be used
//! while piping results elsewhere.
//!
//! The level is chosen in this order:
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. `--quiet`: errors only
//! 3. `-v` info, `-vv` debug, `-vvv` trace
//! 4. Default: warnings, which includes every non-fatal file error
//!
//! # Example
//!
//! ```rust,no_run
//! use twinfind::logging::init_logging;
//!
//! init_logging(1, false);
//! log::info!("Scanning");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem from CLI verbosity flags.
///
/// Call once at startup. A second call leaves the first logger in place
/// and returns `false`.
pub fn init_logging(verbose: u8, quiet: bool) -> bool {
    let from_env = env::var_os("RUST_LOG").is_some();
    let mut builder = Builder::new();

    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    let detailed = cfg!(debug_assertions) || verbose >= 2;
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        if detailed {
            writeln!(
                buf,
                "{} {style}{:<5}{style:#} [{}] {}",
                buf.timestamp_millis(),
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        }
    });

    let installed = builder.try_init().is_ok();
    if installed {
        log::debug!(
            "Logging initialized at level {} ({})",
            log::max_level(),
            if from_env { "RUST_LOG" } else { "flags" }
        );
    }
    installed
}

/// Map CLI flags to a level filter.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
