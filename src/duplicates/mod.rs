//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based candidate grouping
//! - Pairwise comparison and digest matching of size groups
//! - Run-wide progress and error bookkeeping
//! - The end-to-end finder pipeline

pub mod finder;
pub mod groups;
pub mod resolver;
pub mod state;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{group_by_size, DuplicateSet, GroupingStats, MatchMethod, SizeGroup};
pub use resolver::{cmp_by_digest_then_path, GroupOutcome, Resolver};
pub use state::{ProgressThrottle, ScanState, PROGRESS_INTERVAL};
