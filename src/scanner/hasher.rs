//! Streaming content digests.
//!
//! # Overview
//!
//! The [`Hasher`] streams a file's primary data stream through a fixed-size
//! buffer into a 256-bit cryptographic accumulator (BLAKE3 by default,
//! SHA-256 optionally). Digests of [`CandidateFile`]s are memoized on the
//! candidate itself, so each file is read at most once per run.
//!
//! A read failure turns the candidate's digest into
//! [`DigestState::Failed`], which never matches anything. The file handle is
//! scoped to the digest call and closed on every exit path.
//!
//! # Example
//!
//! ```no_run
//! use twinfind::scanner::{DigestAlgorithm, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new().with_algorithm(DigestAlgorithm::Sha256);
//! let digest = hasher.digest_file(Path::new("Cargo.toml")).unwrap();
//! println!("{}", digest.to_hex());
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};

use super::{CandidateFile, DigestState, FileError};
use crate::duplicates::ScanState;

/// Default read buffer size (512 KiB).
pub const BUFFER_SIZE: usize = 0x80000;

/// Supported digest algorithms. Both produce 32 bytes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// BLAKE3 (fast, cryptographically secure)
    #[default]
    Blake3,
    /// SHA-256
    Sha256,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestAlgorithm::Blake3 => write!(f, "blake3"),
            DigestAlgorithm::Sha256 => write!(f, "sha256"),
        }
    }
}

/// A 256-bit content digest.
///
/// Ordering is plain lexicographic byte order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hexadecimal representation (64 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Running hash state for one digest computation.
enum Accumulator {
    Blake3(Box<blake3::Hasher>),
    Sha256(Sha256),
}

impl Accumulator {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Blake3 => Accumulator::Blake3(Box::new(blake3::Hasher::new())),
            DigestAlgorithm::Sha256 => Accumulator::Sha256(Sha256::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Accumulator::Blake3(hasher) => {
                hasher.update(data);
            }
            Accumulator::Sha256(hasher) => hasher.update(data),
        }
    }

    fn finalize(self) -> Digest {
        match self {
            Accumulator::Blake3(hasher) => Digest(*hasher.finalize().as_bytes()),
            Accumulator::Sha256(hasher) => Digest(hasher.finalize().into()),
        }
    }
}

/// Digest engine.
#[derive(Debug, Clone)]
pub struct Hasher {
    algorithm: DigestAlgorithm,
    buffer_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a BLAKE3 hasher with the default buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            buffer_size: BUFFER_SIZE,
        }
    }

    /// Select the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the read buffer size (at least one byte).
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// The configured algorithm.
    #[must_use]
    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Digest everything `reader` yields until end of stream.
    ///
    /// # Errors
    ///
    /// Returns the first read error; a partial digest is never returned.
    pub fn digest_reader<R: Read>(&self, reader: &mut R) -> io::Result<Digest> {
        let mut buffer = vec![0u8; self.buffer_size];
        let mut accumulator = Accumulator::new(self.algorithm);

        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            accumulator.update(&buffer[..n]);
        }

        Ok(accumulator.finalize())
    }

    /// Digest the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`FileError`] if the file cannot be opened or read.
    pub fn digest_file(&self, path: &Path) -> Result<Digest, FileError> {
        let mut file = File::open(path).map_err(|e| FileError::from_io(path, e))?;
        self.digest_reader(&mut file)
            .map_err(|e| FileError::from_io(path, e))
    }

    /// Return the candidate's digest, computing it on first use.
    ///
    /// The first call reads the file, records the outcome (a failure is
    /// reported to `state` and memoized as [`DigestState::Failed`]) and
    /// marks the file as no longer pending. Later calls never touch the
    /// disk.
    pub fn digest_candidate<'a>(
        &self,
        file: &'a mut CandidateFile,
        state: &mut ScanState,
    ) -> &'a DigestState {
        if !file.digest().is_resolved() {
            let outcome = match self.digest_file(&file.path) {
                Ok(digest) => DigestState::Computed(digest),
                Err(e) => {
                    state.complain("This file was not compared because it could not be read", e);
                    DigestState::Failed
                }
            };
            log::trace!("Digested {}: {:?}", file.path.display(), outcome);
            file.set_digest(outcome);
            state.record_digest();
            state.reduce_pending(1);
        }
        file.digest()
    }
}
