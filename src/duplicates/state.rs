//! Progress and error bookkeeping for one run.
//!
//! [`ScanState`] owns the run-wide counters (files scanned, files still to be
//! read, non-fatal errors) and decides when a progress tick is due. It is
//! passed by `&mut` through traversal and resolution, so a single logical
//! phase owns it at any time and no locking is needed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::duplicates::DuplicateSet;
use crate::progress::{Phase, ProgressCallback};
use crate::scanner::FileError;

/// Default minimum interval between two progress ticks.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// Wall-clock throttle for progress output.
///
/// A tick that is not due is dropped, never queued.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    next_due: Option<Instant>,
}

impl ProgressThrottle {
    /// Create a throttle whose first tick is due immediately.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Returns true if a tick is due at `now`, and if so schedules the next one.
    pub fn is_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now < due => false,
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// Make the next tick due immediately.
    pub fn expedite(&mut self) {
        self.next_due = None;
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(PROGRESS_INTERVAL)
    }
}

/// Run-wide counters plus the error sink.
pub struct ScanState {
    scanned: usize,
    pending: usize,
    errors: usize,
    digests_computed: usize,
    error_log: Vec<FileError>,
    throttle: ProgressThrottle,
    callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanState")
            .field("scanned", &self.scanned)
            .field("pending", &self.pending)
            .field("errors", &self.errors)
            .field("digests_computed", &self.digests_computed)
            .field("throttle", &self.throttle)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanState {
    /// Fresh counters with the default progress interval and no reporter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scanned: 0,
            pending: 0,
            errors: 0,
            digests_computed: 0,
            error_log: Vec::new(),
            throttle: ProgressThrottle::default(),
            callback: None,
        }
    }

    /// Set the minimum interval between progress ticks.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.throttle = ProgressThrottle::new(interval);
        self
    }

    /// Attach the reporting collaborator.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Count one visited traversal entry.
    pub fn record_scanned(&mut self) {
        self.scanned += 1;
        self.tick(Phase::Scanning, self.scanned);
    }

    /// Add files that will have to be read.
    pub fn add_pending(&mut self, count: usize) {
        self.pending += count;
    }

    /// Mark files as read (compared or digested, successfully or not).
    pub fn reduce_pending(&mut self, count: usize) {
        debug_assert!(count <= self.pending, "pending counter underflow");
        self.pending = self.pending.saturating_sub(count);
        self.tick(Phase::Reading, self.pending);
    }

    /// Count one digest computation attempt.
    pub fn record_digest(&mut self) {
        self.digests_computed += 1;
    }

    /// Report a non-fatal error: log it, count it and forward it to the sink.
    pub fn complain(&mut self, message: &str, error: FileError) {
        self.errors += 1;
        log::warn!("{message}: {error}");
        if let Some(ref callback) = self.callback {
            callback.on_error(message, &error);
        }
        self.error_log.push(error);
        self.throttle.expedite();
    }

    /// Forward a confirmed duplicate set to the reporter.
    pub fn report_duplicate_set(&mut self, set: &DuplicateSet) {
        if let Some(ref callback) = self.callback {
            callback.on_duplicate_set(set);
        }
        self.throttle.expedite();
    }

    pub(crate) fn phase_start(&mut self, phase: Phase, total: usize) {
        if let Some(ref callback) = self.callback {
            callback.on_phase_start(phase, total);
        }
        self.throttle.expedite();
    }

    pub(crate) fn phase_end(&mut self, phase: Phase) {
        let count = match phase {
            Phase::Scanning => self.scanned,
            Phase::Reading => self.pending,
        };
        if let Some(ref callback) = self.callback {
            callback.on_phase_end(phase, count);
        }
    }

    fn tick(&mut self, phase: Phase, count: usize) {
        if let Some(ref callback) = self.callback {
            if self.throttle.is_due(Instant::now()) {
                callback.on_progress(phase, count);
            }
        }
    }

    /// Entries visited by the traversal so far.
    #[must_use]
    pub fn scanned(&self) -> usize {
        self.scanned
    }

    /// Files still waiting to be compared or digested.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Non-fatal errors so far.
    #[must_use]
    pub fn errors(&self) -> usize {
        self.errors
    }

    /// Digest computations attempted so far.
    #[must_use]
    pub fn digests_computed(&self) -> usize {
        self.digests_computed
    }

    /// Errors collected so far.
    #[must_use]
    pub fn error_log(&self) -> &[FileError] {
        &self.error_log
    }

    /// Take the collected errors, leaving the count untouched.
    pub fn take_errors(&mut self) -> Vec<FileError> {
        std::mem::take(&mut self.error_log)
    }
}
