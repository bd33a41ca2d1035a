//! Turning size groups into duplicate sets.
//!
//! A group of exactly two files is settled by direct comparison, which can
//! stop at the first differing chunk. Larger groups are digested (each file
//! read once), sorted by digest then path, and scanned for runs of equal
//! digests.

use std::cmp::Ordering;

use super::{DuplicateSet, ScanState, SizeGroup};
use crate::scanner::{CandidateFile, Comparator, Hasher};

/// Duplicate sets found in one size group.
#[derive(Debug, Clone, Default)]
pub struct GroupOutcome {
    /// Confirmed sets, in digest-then-path order
    pub sets: Vec<DuplicateSet>,
    /// Bytes reclaimable by keeping one copy per set
    pub wasted: u64,
}

impl GroupOutcome {
    fn push(&mut self, set: DuplicateSet, state: &mut ScanState) {
        log::debug!(
            "Found {} {} files of {} bytes",
            set.len(),
            set.method,
            set.size
        );
        self.wasted += set.wasted_bytes();
        state.report_duplicate_set(&set);
        self.sets.push(set);
    }
}

/// Sort key for digest-matched groups: digest bytes, then path.
///
/// Files without a usable digest sort first, so they never sit between two
/// matching files.
#[must_use]
pub fn cmp_by_digest_then_path(a: &CandidateFile, b: &CandidateFile) -> Ordering {
    a.digest()
        .value()
        .cmp(&b.digest().value())
        .then_with(|| a.path.cmp(&b.path))
}

/// Resolves size groups with the configured comparator and digest engine.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    comparator: Comparator,
    hasher: Hasher,
}

impl Resolver {
    /// Create a resolver.
    #[must_use]
    pub fn new(comparator: Comparator, hasher: Hasher) -> Self {
        Self { comparator, hasher }
    }

    /// Find the duplicate sets within one size group.
    pub fn resolve(&self, group: SizeGroup, state: &mut ScanState) -> GroupOutcome {
        match group.len() {
            0 | 1 => GroupOutcome::default(),
            2 => self.resolve_pair(group, state),
            _ => self.resolve_by_digest(group, state),
        }
    }

    fn resolve_pair(&self, group: SizeGroup, state: &mut ScanState) -> GroupOutcome {
        let mut outcome = GroupOutcome::default();
        let mut files = group.files.into_iter();
        let (Some(a), Some(b)) = (files.next(), files.next()) else {
            return outcome;
        };

        if self.comparator.files_equal(&a, &b, state) {
            outcome.push(DuplicateSet::compared_pair(group.size, a.path, b.path), state);
        }
        outcome
    }

    fn resolve_by_digest(&self, group: SizeGroup, state: &mut ScanState) -> GroupOutcome {
        let size = group.size;
        let mut files = group.files;

        for file in &mut files {
            self.hasher.digest_candidate(file, state);
        }
        files.sort_by(cmp_by_digest_then_path);

        let mut outcome = GroupOutcome::default();
        let mut start = 0;
        for end in 1..=files.len() {
            if end < files.len() && files[end].digest().matches(files[start].digest()) {
                continue;
            }
            if end - start >= 2 {
                if let Some(digest) = files[start].digest().value().copied() {
                    let paths = files[start..end].iter().map(|f| f.path.clone()).collect();
                    outcome.push(DuplicateSet::digest_matched(size, digest, paths), state);
                }
            }
            start = end;
        }
        outcome
    }
}
