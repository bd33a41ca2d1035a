//! Canonical identities already scanned.
//!
//! # Overview
//!
//! The same file can be reached more than once: two overlapping root
//! arguments, a root that is also nested inside another root, or a root that
//! is a symlink into a tree that is also scanned. Keying on the canonical
//! (symlink-free, absolute) path makes every one of those collapse to a
//! single visit.
//!
//! # Example
//!
//! ```
//! use twinfind::scanner::VisitedSet;
//! use std::path::Path;
//!
//! let mut visited = VisitedSet::new();
//!
//! assert!(visited.insert(Path::new("/data/a.txt")));  // First visit
//! assert!(!visited.insert(Path::new("/data/a.txt"))); // Already scanned
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of canonical paths already scanned by one traversal.
///
/// Not thread-safe; a traversal owns exactly one.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<PathBuf>,
}

impl VisitedSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Record a canonical path.
    ///
    /// Returns `true` if the path was not seen before, meaning the caller
    /// should scan it now.
    pub fn insert(&mut self, canonical: &Path) -> bool {
        if self.seen.contains(canonical) {
            return false;
        }
        self.seen.insert(canonical.to_path_buf())
    }
}
