//! Byte-for-byte comparison of two files.
//!
//! Used for size groups of exactly two files, where reading both files in
//! lock-step and stopping at the first difference is usually much cheaper
//! than digesting both in full.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use super::{CandidateFile, FileError, BUFFER_SIZE};
use crate::duplicates::ScanState;

/// Which of the two compared streams failed.
#[derive(Debug, Clone, Copy)]
enum Stream {
    First,
    Second,
}

/// Compare two streams chunk by chunk.
///
/// Both streams are read into equally sized buffers. Reading stops at the
/// first chunk whose length or content differs; streams are equal only if
/// both end at the same offset.
///
/// # Errors
///
/// Returns the first read error from either stream.
///
/// # Example
///
/// ```
/// use twinfind::scanner::compare_streams;
/// use std::io::Cursor;
///
/// let equal = compare_streams(&mut Cursor::new(b"abc"), &mut Cursor::new(b"abc"), 2).unwrap();
/// assert!(equal);
/// ```
pub fn compare_streams<A: Read, B: Read>(
    a: &mut A,
    b: &mut B,
    buffer_size: usize,
) -> io::Result<bool> {
    lockstep(a, b, buffer_size).map_err(|(_, e)| e)
}

fn lockstep<A: Read, B: Read>(
    a: &mut A,
    b: &mut B,
    buffer_size: usize,
) -> Result<bool, (Stream, io::Error)> {
    let buffer_size = buffer_size.max(1);
    let mut buf_a = vec![0u8; buffer_size];
    let mut buf_b = vec![0u8; buffer_size];

    loop {
        let n_a = read_full(a, &mut buf_a).map_err(|e| (Stream::First, e))?;
        let n_b = read_full(b, &mut buf_b).map_err(|e| (Stream::Second, e))?;

        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a < buffer_size {
            return Ok(true);
        }
    }
}

/// Fill `buf` unless the stream ends first. Returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Pairwise file comparator.
#[derive(Debug, Clone)]
pub struct Comparator {
    buffer_size: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator {
    /// Create a comparator with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
        }
    }

    /// Set the per-stream buffer size (at least one byte).
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Whether two same-sized candidates have identical content.
    ///
    /// The on-disk sizes are checked again first; a file that changed size
    /// since the scan simply compares not-equal. Any failure is reported to
    /// `state` and yields `false`. Both files count as read afterwards.
    pub fn files_equal(&self, a: &CandidateFile, b: &CandidateFile, state: &mut ScanState) -> bool {
        let equal = match self.compare_files(a, b) {
            Ok(equal) => equal,
            Err(e) => {
                state.complain("These files were not compared because of an error", e);
                false
            }
        };
        log::debug!(
            "Compared {} and {}: {}",
            a.path.display(),
            b.path.display(),
            if equal { "equal" } else { "different" }
        );
        state.reduce_pending(2);
        equal
    }

    fn compare_files(&self, a: &CandidateFile, b: &CandidateFile) -> Result<bool, FileError> {
        if current_size(&a.path)? != a.size || current_size(&b.path)? != b.size {
            log::debug!(
                "Size changed since scan: {} / {}",
                a.path.display(),
                b.path.display()
            );
            return Ok(false);
        }

        let mut file_a = File::open(&a.path).map_err(|e| FileError::from_io(&a.path, e))?;
        let mut file_b = File::open(&b.path).map_err(|e| FileError::from_io(&b.path, e))?;

        lockstep(&mut file_a, &mut file_b, self.buffer_size).map_err(|(stream, e)| match stream {
            Stream::First => FileError::from_io(&a.path, e),
            Stream::Second => FileError::from_io(&b.path, e),
        })
    }
}

fn current_size(path: &Path) -> Result<u64, FileError> {
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| FileError::from_io(path, e))
}
