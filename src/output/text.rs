//! Plain text output.
//!
//! Each duplicate set is printed as a header line followed by its members,
//! indented by two spaces:
//!
//! ```text
//! 2 content-matched 4 B files:
//!   /photos/a.jpg
//!   /backup/a.jpg
//! 3 digest-matched 1.2 MiB files:
//!   /music/x.mp3
//!   /music/copy/x.mp3
//!   /old/x.mp3
//! ```
//!
//! Sets are written as they are found; the closing summary goes to stderr.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::{DuplicateSet, ScanSummary};

/// Indentation for member paths.
pub const INDENT: &str = "  ";

/// Write one duplicate set.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_set<W: Write>(writer: &mut W, set: &DuplicateSet) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} {} files:",
        set.len(),
        set.method,
        ByteSize::b(set.size)
    )?;
    for path in &set.files {
        writeln!(writer, "{INDENT}{}", path.display())?;
    }
    Ok(())
}

/// Write the closing summary.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_summary<W: Write>(writer: &mut W, summary: &ScanSummary) -> io::Result<()> {
    writeln!(
        writer,
        "Search complete! Number of errors: {}",
        summary.error_count
    )?;
    writeln!(writer, "If you deleted all but one file from each set")?;
    writeln!(
        writer,
        "then you could reclaim about {} of storage space.",
        summary.reclaimable_display()
    )
}
