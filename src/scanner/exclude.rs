//! Path exclusion predicates.
//!
//! Traversal asks a [`PathFilter`] about every entry before looking at it,
//! so an excluded directory is never descended into.
//!
//! [`ExcludePatterns`] is the regex-based filter used by the CLI. Users
//! mostly care about the end of a path (the file name), so every pattern is
//! implicitly prefixed with "anything ending in a separator". A pattern that
//! starts with `^` matches against the whole path instead.
//!
//! # Example
//!
//! ```
//! use twinfind::scanner::{ExcludePatterns, PathFilter};
//! use std::path::Path;
//!
//! let patterns = ExcludePatterns::new(&["\\.git".to_string(), ".*\\.tmp".to_string()]).unwrap().unwrap();
//!
//! assert!(patterns.is_excluded(Path::new("/home/me/project/.git")));
//! assert!(patterns.is_excluded(Path::new("/home/me/notes.TMP")));
//! assert!(!patterns.is_excluded(Path::new("/home/me/project/.github")));
//! ```

use std::path::{Path, MAIN_SEPARATOR};

use regex::{Regex, RegexBuilder};

/// Predicate deciding whether a path is skipped during traversal.
pub trait PathFilter: Send + Sync {
    /// Returns true when `path` (and everything beneath it) must be skipped.
    fn is_excluded(&self, path: &Path) -> bool;
}

impl<F> PathFilter for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_excluded(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Regex exclusion built from user-supplied fragments.
#[derive(Debug, Clone)]
pub struct ExcludePatterns {
    regex: Regex,
}

impl ExcludePatterns {
    /// Compile the given fragments into a single exclusion regex.
    ///
    /// Fragments are OR-joined and must match the whole path, optionally
    /// preceded by any directory prefix. Matching is case-insensitive and
    /// Unicode-aware, and `.` also matches newlines.
    ///
    /// Returns `Ok(None)` when no fragments are given.
    ///
    /// # Errors
    ///
    /// Returns the regex compilation error if a fragment is invalid.
    pub fn new(fragments: &[String]) -> Result<Option<Self>, regex::Error> {
        if fragments.is_empty() {
            return Ok(None);
        }

        let separator = regex::escape(&MAIN_SEPARATOR.to_string());
        let mut pattern = format!("^(?:.*{separator})?(?:{})$", fragments.join("|"));

        // Backslashes must be escaped in a regex, so on Windows a slash in a
        // fragment stands for the path separator.
        if cfg!(windows) {
            pattern = pattern.replace('/', r"\\");
        }

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .unicode(true)
            .dot_matches_new_line(true)
            .build()?;

        log::debug!("Exclusion regex: {}", regex.as_str());
        Ok(Some(Self { regex }))
    }

    /// The compiled regex, for diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl PathFilter for ExcludePatterns {
    fn is_excluded(&self, path: &Path) -> bool {
        self.regex.is_match(&path.to_string_lossy())
    }
}
