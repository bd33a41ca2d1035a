//! Candidate collection over files and directory trees.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which turns a list of root
//! paths into the flat list of [`CandidateFile`]s the grouping phase works
//! on.
//!
//! # Symlink policy
//!
//! Root paths are canonicalized once, up front, by [`Walker::prepare_roots`].
//! A symlink named on the command line is therefore followed exactly once.
//! Symlinks met while descending are never followed: an entry is only
//! scanned when its absolute path equals its canonical path and that
//! canonical path has not been scanned before. This keeps traversal finite
//! in the presence of cyclic directory links and makes overlapping roots
//! harmless.
//!
//! Children are visited in file-name order. Special files (pipes, sockets,
//! devices) are counted as scanned and otherwise ignored; they are never
//! opened.
//!
//! # Example
//!
//! ```no_run
//! use twinfind::duplicates::ScanState;
//! use twinfind::scanner::{Walker, WalkerConfig};
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(WalkerConfig::default());
//! let roots = walker.prepare_roots(&[PathBuf::from("/home/user/Downloads")]).unwrap();
//!
//! let mut state = ScanState::new();
//! let files = walker.collect(&roots, &mut state);
//! println!("{} candidates out of {} entries", files.len(), state.scanned());
//! ```

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{CandidateFile, FileError, VisitedSet, WalkerConfig};
use crate::duplicates::{FinderError, ScanState};
use crate::progress::Phase;

/// Depth-first candidate collector over `walkdir`.
#[derive(Debug, Default)]
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker.
    ///
    /// # Example
    ///
    /// ```
    /// use twinfind::scanner::{Walker, WalkerConfig};
    ///
    /// let walker = Walker::new(WalkerConfig::default());
    /// ```
    #[must_use]
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// The walker configuration.
    #[must_use]
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Validate and canonicalize the root arguments.
    ///
    /// Every root must exist, be readable (a directory must be listable, a
    /// file openable) and have a canonical path. Roots are returned in the
    /// given order.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::NoPaths`] for an empty list, and a root error
    /// for the first root that fails validation.
    pub fn prepare_roots(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>, FinderError> {
        if paths.is_empty() {
            return Err(FinderError::NoPaths);
        }
        paths.iter().map(|path| canonical_root(path)).collect()
    }

    /// Collect all candidates beneath `roots`.
    ///
    /// `roots` should come from [`Walker::prepare_roots`]. Failures on
    /// individual entries are reported to `state` and the entry is skipped;
    /// this never fails as a whole.
    pub fn collect(&self, roots: &[PathBuf], state: &mut ScanState) -> Vec<CandidateFile> {
        let mut visited = VisitedSet::new();
        let mut candidates = Vec::new();

        state.phase_start(Phase::Scanning, 0);

        for root in roots {
            log::info!("Scanning {}", root.display());
            let mut it = WalkDir::new(root)
                .follow_links(false)
                .follow_root_links(true)
                .sort_by_file_name()
                .into_iter();

            while let Some(result) = it.next() {
                let entry = match result {
                    Ok(entry) => entry,
                    Err(err) => {
                        state.complain(
                            "The files in this folder were not compared because it could not be listed",
                            walk_error(root, err),
                        );
                        continue;
                    }
                };

                let descend = if self.config.is_excluded(entry.path()) {
                    log::trace!("Excluded: {}", entry.path().display());
                    false
                } else {
                    self.visit(&entry, &mut visited, &mut candidates, state)
                };
                if !descend && entry.file_type().is_dir() {
                    it.skip_current_dir();
                }
                state.record_scanned();
            }
        }

        state.phase_end(Phase::Scanning);
        log::info!(
            "Collected {} candidate(s) from {} entries",
            candidates.len(),
            state.scanned()
        );
        candidates
    }

    /// Inspect one entry. Returns whether a directory entry may be descended into.
    fn visit(
        &self,
        entry: &DirEntry,
        visited: &mut VisitedSet,
        candidates: &mut Vec<CandidateFile>,
        state: &mut ScanState,
    ) -> bool {
        let path = entry.path();
        let canonical = match fs::canonicalize(path) {
            Ok(canonical) => canonical,
            Err(source) => {
                state.complain(
                    "This file was not compared because its canonical path could not be determined",
                    FileError::Canonicalize {
                        path: path.to_path_buf(),
                        source,
                    },
                );
                return false;
            }
        };

        // Roots are canonical, so every entry path is already absolute.
        if canonical != path {
            log::trace!("Not following symlink: {}", path.display());
            return false;
        }

        if !visited.insert(&canonical) {
            log::trace!("Already scanned: {}", path.display());
            return false;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                state.complain(
                    "This file was not compared because its attributes could not be read",
                    walk_error(path, err),
                );
                return false;
            }
        };

        if metadata.is_file() {
            let size = metadata.len();
            if size < self.config.min_size {
                log::trace!("Below minimum size ({} bytes): {}", size, path.display());
                return false;
            }
            match File::open(path) {
                Ok(_) => candidates.push(CandidateFile::new(path.to_path_buf(), size)),
                Err(e) => state.complain(
                    "This file was not compared because it could not be read",
                    FileError::from_io(path, e),
                ),
            }
        } else if !metadata.is_dir() {
            log::trace!("Not a regular file: {}", path.display());
        }
        metadata.is_dir()
    }
}

/// Map a traversal error onto the path it happened at.
fn walk_error(fallback: &Path, err: walkdir::Error) -> FileError {
    let path = err.path().unwrap_or(fallback).to_path_buf();
    FileError::from_io(&path, io::Error::from(err))
}

fn canonical_root(path: &Path) -> Result<PathBuf, FinderError> {
    let unreadable = |source: io::Error| FinderError::RootUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let canonical = fs::canonicalize(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FinderError::RootNotFound(path.to_path_buf()),
        _ => unreadable(e),
    })?;

    // Only regular files are opened; opening a FIFO would wait for a writer.
    let metadata = fs::metadata(&canonical).map_err(unreadable)?;
    if metadata.is_dir() {
        fs::read_dir(&canonical).map_err(unreadable)?;
    } else if metadata.is_file() {
        File::open(&canonical).map_err(unreadable)?;
    } else {
        log::debug!("Root {} is not a regular file", canonical.display());
    }

    if canonical != path {
        log::debug!("Root {} resolves to {}", path.display(), canonical.display());
    }
    Ok(canonical)
}
