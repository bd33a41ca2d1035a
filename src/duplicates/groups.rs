//! Size grouping and duplicate sets.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection. Files with
//! different sizes cannot be duplicates, so candidates are partitioned by
//! their scan-time size and every size shared by fewer than two files is
//! dropped. No file content is read in this phase.
//!
//! # Example
//!
//! ```
//! use twinfind::duplicates::{group_by_size, ScanState};
//! use twinfind::scanner::CandidateFile;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     CandidateFile::new(PathBuf::from("/file1.txt"), 1024),
//!     CandidateFile::new(PathBuf::from("/file2.txt"), 1024),
//!     CandidateFile::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let mut state = ScanState::new();
//! let (groups, stats) = group_by_size(files, &mut state);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2); // Two 1024-byte files
//! assert_eq!(groups.len(), 1);
//! assert_eq!(state.pending(), 2);
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::ScanState;
use crate::scanner::{CandidateFile, Digest};

/// Files sharing one scan-time size.
#[derive(Debug, Clone)]
pub struct SizeGroup {
    /// File size in bytes (shared by all files in this group)
    pub size: u64,
    /// Files with this exact size, in traversal order
    pub files: Vec<CandidateFile>,
}

impl SizeGroup {
    /// Create a size group with initial files.
    #[must_use]
    pub fn with_files(size: u64, files: Vec<CandidateFile>) -> Self {
        debug_assert!(files.iter().all(|f| f.size == size));
        Self { size, files }
    }

    /// Add a file to this group.
    ///
    /// # Panics
    ///
    /// Debug assertion fails if file size doesn't match group size.
    pub fn add(&mut self, file: CandidateFile) {
        debug_assert_eq!(
            file.size, self.size,
            "File size {} doesn't match group size {}",
            file.size, self.size
        );
        self.files.push(file);
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// How a duplicate set was proven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Two files compared byte for byte
    ContentCompared,
    /// Three or more files with identical digests
    DigestMatched,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::ContentCompared => write!(f, "content-matched"),
            MatchMethod::DigestMatched => write!(f, "digest-matched"),
        }
    }
}

/// Confirmed set of byte-identical files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSet {
    /// File size in bytes, shared by every member
    pub size: u64,
    /// Member paths in lexicographic order
    pub files: Vec<PathBuf>,
    /// How the members were matched
    pub method: MatchMethod,
    /// Shared digest for digest-matched sets
    pub digest: Option<Digest>,
}

impl DuplicateSet {
    /// A pair proven equal by direct comparison. Paths are put in order.
    #[must_use]
    pub fn compared_pair(size: u64, a: PathBuf, b: PathBuf) -> Self {
        let files = if a <= b { vec![a, b] } else { vec![b, a] };
        Self {
            size,
            files,
            method: MatchMethod::ContentCompared,
            digest: None,
        }
    }

    /// Files sharing `digest`, already in path order.
    #[must_use]
    pub fn digest_matched(size: u64, digest: Digest, files: Vec<PathBuf>) -> Self {
        Self {
            size,
            files,
            method: MatchMethod::DigestMatched,
            digest: Some(digest),
        }
    }

    /// Number of files in this set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of redundant copies (all members but one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes reclaimable by keeping a single copy.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }

    /// Shared digest as hexadecimal, if the set was digest-matched.
    #[must_use]
    pub fn digest_hex(&self) -> Option<String> {
        self.digest.as_ref().map(Digest::to_hex)
    }
}

/// Statistics from size grouping phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated because their size is unique
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group candidates by size.
///
/// Candidates are stable-sorted by size and scanned once. A file only opens
/// a group once a second file of the same size shows up; singletons never
/// get a group. Every file placed in a group is added to the pending
/// counter of `state`.
///
/// Groups come out in ascending size order; within a group, files keep
/// their traversal order.
#[must_use]
pub fn group_by_size(
    mut files: Vec<CandidateFile>,
    state: &mut ScanState,
) -> (Vec<SizeGroup>, GroupingStats) {
    let mut stats = GroupingStats {
        total_files: files.len(),
        total_size: files.iter().map(|f| f.size).sum(),
        ..Default::default()
    };

    files.sort_by_key(|f| f.size);

    let mut groups: Vec<SizeGroup> = Vec::new();
    let mut previous: Option<CandidateFile> = None;
    let mut last_size = None;

    for file in files {
        if last_size != Some(file.size) {
            stats.unique_sizes += 1;
            last_size = Some(file.size);
        }

        if let Some(group) = groups.last_mut().filter(|g| g.size == file.size) {
            group.add(file);
            state.add_pending(1);
            continue;
        }

        match previous.take() {
            Some(first) if first.size == file.size => {
                groups.push(SizeGroup::with_files(file.size, vec![first, file]));
                state.add_pending(2);
            }
            _ => previous = Some(file),
        }
    }

    stats.duplicate_groups = groups.len();
    stats.potential_duplicates = groups.iter().map(SizeGroup::len).sum();
    stats.eliminated_unique = stats.total_files - stats.potential_duplicates;

    log::info!(
        "Size grouping: {} files, {} potential duplicates in {} groups ({:.1}% eliminated)",
        stats.total_files,
        stats.potential_duplicates,
        stats.duplicate_groups,
        stats.elimination_rate()
    );

    (groups, stats)
}
