//! Duplicate finder pipeline.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Collect**: Walk the roots into a flat candidate list (see [`crate::scanner::walker`])
//! 2. **Group**: Partition candidates by size (see [`crate::duplicates::groups`])
//! 3. **Resolve**: Compare pairs directly, digest larger groups (see [`crate::duplicates::resolver`])
//!
//! Fatal problems with the run as a whole (missing roots, a bad exclusion
//! pattern) surface as [`FinderError`] before any scanning starts. Problems
//! with individual files are counted in the [`ScanSummary`] and never stop
//! the run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::resolver::Resolver;
use super::state::PROGRESS_INTERVAL;
use super::{group_by_size, DuplicateSet, ScanState};
use crate::progress::{Phase, ProgressCallback};
use crate::scanner::{
    Comparator, DigestAlgorithm, ExcludePatterns, FileError, Hasher, PathFilter, Walker,
    WalkerConfig, BUFFER_SIZE,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration for candidate collection.
    pub walker_config: WalkerConfig,
    /// Digest algorithm for groups of three or more files.
    pub digest: DigestAlgorithm,
    /// Read buffer size per stream, in bytes.
    pub buffer_size: usize,
    /// Minimum interval between progress ticks.
    pub progress_interval: Duration,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("digest", &self.digest)
            .field("buffer_size", &self.buffer_size)
            .field("progress_interval", &self.progress_interval)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            digest: DigestAlgorithm::default(),
            buffer_size: BUFFER_SIZE,
            progress_interval: PROGRESS_INTERVAL,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the minimum candidate size in bytes.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.walker_config.min_size = min_size;
        self
    }

    /// Set the exclusion predicate.
    #[must_use]
    pub fn with_exclude(mut self, filter: Arc<dyn PathFilter>) -> Self {
        self.walker_config.exclude = Some(filter);
        self
    }

    /// Compile regex fragments into the exclusion predicate.
    ///
    /// An empty list leaves the configuration unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::InvalidPattern`] if a fragment is not a valid regex.
    pub fn with_exclude_patterns(self, fragments: &[String]) -> Result<Self, FinderError> {
        Ok(match ExcludePatterns::new(fragments)? {
            Some(patterns) => self.with_exclude(Arc::new(patterns)),
            None => self,
        })
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_digest(mut self, digest: DigestAlgorithm) -> Self {
        self.digest = digest;
        self
    }

    /// Set the read buffer size (at least one byte).
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Set the minimum interval between progress ticks.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Traversal entries visited, including filtered ones
    pub files_scanned: usize,
    /// Files that passed every filter
    pub candidates: usize,
    /// Size groups with two or more files
    pub size_groups: usize,
    /// Files that had to be read (members of size groups)
    pub files_read: usize,
    /// Digest computations performed
    pub digests_computed: usize,
    /// Number of confirmed duplicate sets
    pub duplicate_sets: usize,
    /// Total number of redundant copies (excluding one per set)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_bytes: u64,
    /// Number of non-fatal errors
    pub error_count: usize,
    /// Non-fatal errors encountered during the scan
    pub errors: Vec<FileError>,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Format reclaimable space as human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_bytes).to_string()
    }

    /// Whether any non-fatal error occurred.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Errors that stop a run before scanning begins.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// No root paths were given.
    #[error("No paths to scan")]
    NoPaths,

    /// A root path does not exist.
    #[error("Path not found: {0}")]
    RootNotFound(PathBuf),

    /// A root path exists but cannot be read or resolved.
    #[error("This file could not be read: {path}: {source}")]
    RootUnreadable {
        /// The root as given
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An exclusion fragment is not a valid regex.
    #[error("Invalid exclusion pattern, please check the syntax of your regex: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Duplicate finder that runs collection, grouping and resolution.
///
/// # Example
///
/// ```no_run
/// use twinfind::duplicates::{DuplicateFinder, FinderConfig};
/// use std::path::PathBuf;
///
/// let config = FinderConfig::default().with_min_size(1024);
/// let finder = DuplicateFinder::new(config);
///
/// let (sets, summary) = finder.find_duplicates_in_paths(vec![PathBuf::from(".")]).unwrap();
///
/// println!("Found {} duplicate sets", sets.len());
/// println!("Reclaimable space: {}", summary.reclaimable_display());
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The finder configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Find all duplicate files among the given files and directory trees.
    ///
    /// # Returns
    ///
    /// A tuple of:
    /// - `Vec<DuplicateSet>` - Confirmed duplicate sets, in ascending size order
    /// - `ScanSummary` - Statistics about the scan
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if no paths are given or a root cannot be
    /// resolved. Per-file failures are reported in the summary instead.
    pub fn find_duplicates_in_paths(
        &self,
        paths: Vec<PathBuf>,
    ) -> Result<(Vec<DuplicateSet>, ScanSummary), FinderError> {
        let start_time = Instant::now();

        let walker = Walker::new(self.config.walker_config.clone());
        let roots = walker.prepare_roots(&paths)?;

        log::info!(
            "Scanning {} root(s): {:?}",
            roots.len(),
            roots.iter().map(|p| p.display()).collect::<Vec<_>>()
        );

        let mut state = ScanState::new().with_interval(self.config.progress_interval);
        if let Some(ref callback) = self.config.progress_callback {
            state = state.with_progress_callback(callback.clone());
        }

        let candidates = walker.collect(&roots, &mut state);
        let candidate_count = candidates.len();

        let (size_groups, grouping) = group_by_size(candidates, &mut state);
        let files_read = state.pending();

        let resolver = Resolver::new(
            Comparator::new().with_buffer_size(self.config.buffer_size),
            Hasher::new()
                .with_algorithm(self.config.digest)
                .with_buffer_size(self.config.buffer_size),
        );

        state.phase_start(Phase::Reading, files_read);
        let mut sets = Vec::new();
        let mut reclaimable_bytes = 0;
        for group in size_groups {
            let outcome = resolver.resolve(group, &mut state);
            reclaimable_bytes += outcome.wasted;
            sets.extend(outcome.sets);
        }
        state.phase_end(Phase::Reading);
        debug_assert_eq!(state.pending(), 0, "every grouped file must be read");

        let summary = ScanSummary {
            files_scanned: state.scanned(),
            candidates: candidate_count,
            size_groups: grouping.duplicate_groups,
            files_read,
            digests_computed: state.digests_computed(),
            duplicate_sets: sets.len(),
            duplicate_files: sets.iter().map(DuplicateSet::duplicate_count).sum(),
            reclaimable_bytes,
            error_count: state.errors(),
            errors: state.take_errors(),
            scan_duration: start_time.elapsed(),
        };

        log::info!(
            "Scan complete: {} duplicate sets, {} reclaimable, {} error(s) in {:.2?}",
            summary.duplicate_sets,
            summary.reclaimable_display(),
            summary.error_count,
            summary.scan_duration
        );

        Ok((sets, summary))
    }
}
