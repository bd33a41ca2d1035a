//! Progress reporting utilities using indicatif.
//!
//! This module defines the [`ProgressCallback`] trait, the seam through which
//! the duplicate finder talks to its reporting collaborator, and the
//! [`Progress`] console reporter that renders it on stderr.
//!
//! The finder decides *when* a progress tick is due (see
//! [`ScanState`](crate::duplicates::ScanState)); reporters only render.

use std::io::Write;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::duplicates::DuplicateSet;
use crate::output::text;
use crate::scanner::FileError;

/// Pipeline phase a progress tick refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Traversal; the count is files scanned so far.
    Scanning,
    /// Comparison and digesting; the count is files still to read.
    Reading,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Scanning => write!(f, "Files scanned"),
            Phase::Reading => write!(f, "Files to read"),
        }
    }
}

/// Progress callback for the duplicate finding pipeline.
///
/// Every method has an empty default so implementors only pick what they
/// render.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - The phase starting
    /// * `total` - Items to process (0 when unknown, as for scanning)
    fn on_phase_start(&self, _phase: Phase, _total: usize) {}

    /// Called when a throttled progress tick is due.
    ///
    /// # Arguments
    ///
    /// * `phase` - The running phase
    /// * `count` - Files scanned, or files still pending
    fn on_progress(&self, _phase: Phase, _count: usize) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, _phase: Phase, _count: usize) {}

    /// Called once for every confirmed duplicate set, as soon as it is found.
    fn on_duplicate_set(&self, _set: &DuplicateSet) {}

    /// Called for every non-fatal error.
    ///
    /// # Arguments
    ///
    /// * `message` - What was being attempted
    /// * `error` - The underlying cause
    fn on_error(&self, _message: &str, _error: &FileError) {}
}

/// Console reporter using indicatif.
///
/// Shows a single status line on stderr. When `stream_sets` is set,
/// duplicate sets are printed to stdout in the text format as they are
/// found, with the status line suspended while printing.
pub struct Progress {
    bar: ProgressBar,
    stream_sets: bool,
    visible: bool,
}

impl Progress {
    /// Create a new console reporter.
    ///
    /// # Arguments
    ///
    /// * `hidden` - If true, the status line is never drawn.
    /// * `stream_sets` - Print duplicate sets to stdout as they are found.
    ///
    /// # Examples
    ///
    /// ```
    /// use twinfind::progress::Progress;
    ///
    /// let progress = Progress::new(true, false);
    /// ```
    #[must_use]
    pub fn new(hidden: bool, stream_sets: bool) -> Self {
        let bar = ProgressBar::with_draw_target(None, Self::draw_target(hidden));
        bar.set_style(
            ProgressStyle::with_template("  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self {
            bar,
            stream_sets,
            visible: !hidden,
        }
    }

    fn draw_target(hidden: bool) -> ProgressDrawTarget {
        if hidden {
            ProgressDrawTarget::hidden()
        } else {
            ProgressDrawTarget::stderr()
        }
    }

    fn status(&self, phase: Phase, count: usize) {
        self.bar.set_message(format!("{phase}: {count}"));
    }

    /// Clear the status line for good.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: Phase, total: usize) {
        if phase == Phase::Reading && self.visible {
            self.bar.suspend(|| eprintln!("Total files to read: {total}"));
        }
        self.status(phase, total);
    }

    fn on_progress(&self, phase: Phase, count: usize) {
        self.status(phase, count);
    }

    fn on_phase_end(&self, phase: Phase, count: usize) {
        if phase == Phase::Scanning && self.visible {
            self.bar.suspend(|| eprintln!("Total files scanned: {count}"));
        }
    }

    fn on_duplicate_set(&self, set: &DuplicateSet) {
        if !self.stream_sets {
            return;
        }
        self.bar.suspend(|| {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = text::write_set(&mut stdout, set).and_then(|()| stdout.flush()) {
                log::error!("Failed to write duplicate set: {}", e);
            }
        });
    }

    fn on_error(&self, message: &str, error: &FileError) {
        // Errors are already logged; mirror them on the console when logging
        // is too quiet to show warnings.
        if self.visible && !log::log_enabled!(log::Level::Warn) {
            self.bar.suspend(|| {
                eprintln!("Error: {message}");
                eprintln!("{error}");
            });
        }
    }
}
