//! Scanner module for candidate collection and file content access.
//!
//! This module provides functionality for:
//! - Cycle-safe directory traversal that builds the candidate list
//! - Regex path exclusion
//! - Streaming content digests (BLAKE3 or SHA-256)
//! - Direct byte-for-byte comparison of two files
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`visited`]: Canonical identities already scanned
//! - [`exclude`]: Exclusion predicate over paths
//! - [`hasher`]: Streaming digest engine
//! - [`compare`]: Lock-step pairwise comparison
//!
//! # Example
//!
//! ```no_run
//! use twinfind::duplicates::ScanState;
//! use twinfind::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     min_size: 1024, // Skip files under 1KB
//!     ..Default::default()
//! };
//!
//! let mut state = ScanState::new();
//! let walker = Walker::new(config);
//! let roots = walker.prepare_roots(&[PathBuf::from(".")]).unwrap();
//! for file in walker.collect(&roots, &mut state) {
//!     println!("{}: {} bytes", file.path.display(), file.size);
//! }
//! ```

pub mod compare;
pub mod exclude;
pub mod hasher;
pub mod visited;
pub mod walker;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

// Re-export main types
pub use compare::{compare_streams, Comparator};
pub use exclude::{ExcludePatterns, PathFilter};
pub use hasher::{Digest, DigestAlgorithm, Hasher, BUFFER_SIZE};
pub use visited::VisitedSet;
pub use walker::Walker;

/// One on-disk file eligible for comparison.
///
/// The size is captured once during traversal and is used for every grouping
/// and sorting decision afterwards, even if the file changes on disk. The
/// digest is computed lazily, at most once.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    /// Path of the file as reached by the traversal
    pub path: PathBuf,
    /// File size in bytes at scan time
    pub size: u64,
    digest: DigestState,
}

impl CandidateFile {
    /// Create a new candidate with no digest computed yet.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes at scan time
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            digest: DigestState::NotComputed,
        }
    }

    /// Current state of the memoized digest.
    #[must_use]
    pub fn digest(&self) -> &DigestState {
        &self.digest
    }

    pub(crate) fn set_digest(&mut self, digest: DigestState) {
        self.digest = digest;
    }
}

/// Lazily computed content digest of a [`CandidateFile`].
///
/// `Failed` is the error sentinel: it never matches anything, including
/// another `Failed`. For that reason this type deliberately has no
/// `PartialEq` implementation; use [`DigestState::matches`].
#[derive(Debug, Clone)]
pub enum DigestState {
    /// Not read yet
    NotComputed,
    /// File was read in full
    Computed(Digest),
    /// Reading failed; the file is never a duplicate of anything
    Failed,
}

impl DigestState {
    /// Returns true only when both digests were computed and are identical.
    #[must_use]
    pub fn matches(&self, other: &DigestState) -> bool {
        match (self, other) {
            (DigestState::Computed(a), DigestState::Computed(b)) => a == b,
            _ => false,
        }
    }

    /// Whether the digest has been resolved (successfully or not).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, DigestState::NotComputed)
    }

    /// The computed digest, if any.
    #[must_use]
    pub fn value(&self) -> Option<&Digest> {
        match self {
            DigestState::Computed(digest) => Some(digest),
            _ => None,
        }
    }
}

/// Configuration for candidate collection.
#[derive(Clone)]
pub struct WalkerConfig {
    /// Minimum file size to include (in bytes).
    /// Files smaller than this are never candidates.
    pub min_size: u64,

    /// Optional exclusion predicate, tested before descending into an entry.
    pub exclude: Option<Arc<dyn PathFilter>>,
}

impl fmt::Debug for WalkerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkerConfig")
            .field("min_size", &self.min_size)
            .field("exclude", &self.exclude.as_ref().map(|_| "<filter>"))
            .finish()
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            min_size: 1,
            exclude: None,
        }
    }
}

impl WalkerConfig {
    /// Create a new configuration.
    ///
    /// # Arguments
    ///
    /// * `min_size` - Minimum file size filter
    /// * `exclude` - Optional exclusion predicate
    #[must_use]
    pub fn new(min_size: u64, exclude: Option<Arc<dyn PathFilter>>) -> Self {
        Self { min_size, exclude }
    }

    /// Whether the configured predicate excludes `path`.
    #[must_use]
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.as_ref().is_some_and(|f| f.is_excluded(path))
    }
}

/// Non-fatal errors tied to one file.
///
/// These never abort a scan: they are counted, forwarded to the error sink
/// and the affected file is kept out of every duplicate set.
#[derive(thiserror::Error, Debug)]
pub enum FileError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The file disappeared or never existed.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// The canonical (symlink-free) path could not be determined.
    #[error("Cannot resolve canonical path of {path}: {source}")]
    Canonicalize {
        /// Path whose identity could not be resolved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Any other I/O error while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// Classify an I/O error for `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotFound => FileError::NotFound(path.to_path_buf()),
            _ => FileError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            FileError::PermissionDenied(path) | FileError::NotFound(path) => path,
            FileError::Canonicalize { path, .. } | FileError::Io { path, .. } => path,
        }
    }
}
