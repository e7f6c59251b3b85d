//! Loading per-seed observable files into a [`Dataset`].
//!
//! The loader implements the ingestion contract: given a directory, a
//! filename pattern extracting the seed identifier, and a list of quantity
//! names, it returns a dataset holding one timeseries per quantity per
//! matching file. Per-file read and parse failures skip that seed and are
//! reported as [`IngestDiagnostic`] values; a handful of corrupt output
//! files must not invalidate the rest of the batch.
//!
//! # File format
//!
//! One plain-text file per seed. Lines starting with `#` and blank lines
//! are ignored; the first remaining line is a header naming the quantity
//! columns; every following line holds one sample per column. Columns may
//! be separated by whitespace or commas:
//!
//! ```text
//! # seed 17, production run
//! energy magnetization
//! -1.02  0.31
//! -0.98  0.29
//! ```

mod loader;

pub use loader::{load_directory, read_seed_file, SeedPattern};

use std::fmt;
use std::path::PathBuf;

/// What to do when a requested quantity is absent from a seed's file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingQuantityPolicy {
    /// Abort the ingestion with [`IngestError::MissingQuantity`].
    #[default]
    Fail,
    /// Record a diagnostic and continue without that seed's entry.
    Skip,
}

/// Errors that abort an ingestion.
#[derive(Debug)]
pub enum IngestError {
    /// IO error reading the directory or a file.
    Io(std::io::Error),

    /// Malformed content at a specific line of a seed file.
    Parse {
        /// File in which the error occurred.
        path: PathBuf,
        /// Line number (1-indexed).
        line: usize,
        /// Description of the parse error.
        message: String,
    },

    /// A requested quantity is absent from a seed's file
    /// (under [`MissingQuantityPolicy::Fail`]).
    MissingQuantity {
        /// Seed whose file lacks the quantity.
        seed: String,
        /// The quantity that was requested.
        quantity: String,
        /// Quantities the file actually provides.
        available: Vec<String>,
    },

    /// No file in the directory matched the seed pattern.
    NoSeeds {
        /// The directory that was scanned.
        dir: PathBuf,
    },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io(e) => write!(f, "IO error: {}", e),
            IngestError::Parse {
                path,
                line,
                message,
            } => {
                write!(
                    f,
                    "parse error in {} at line {}: {}",
                    path.display(),
                    line,
                    message
                )
            }
            IngestError::MissingQuantity {
                seed,
                quantity,
                available,
            } => {
                write!(
                    f,
                    "seed '{}' provides no quantity '{}' (available: {:?})",
                    seed, quantity, available
                )
            }
            IngestError::NoSeeds { dir } => {
                write!(f, "no seed files matched in {}", dir.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(e: std::io::Error) -> Self {
        IngestError::Io(e)
    }
}

/// A recovered per-seed problem, reported alongside the loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestDiagnostic {
    /// A matching file could not be read or parsed and was skipped.
    SkippedSeed {
        /// Seed extracted from the file name.
        seed: String,
        /// The offending file.
        path: PathBuf,
        /// Why it was skipped.
        reason: String,
    },

    /// A requested quantity was absent from a seed's file
    /// (under [`MissingQuantityPolicy::Skip`]).
    MissingQuantity {
        /// Seed whose file lacks the quantity.
        seed: String,
        /// The quantity that was requested.
        quantity: String,
    },
}

impl fmt::Display for IngestDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestDiagnostic::SkippedSeed { seed, path, reason } => {
                write!(
                    f,
                    "skipped seed '{}' ({}): {}",
                    seed,
                    path.display(),
                    reason
                )
            }
            IngestDiagnostic::MissingQuantity { seed, quantity } => {
                write!(f, "seed '{}' provides no quantity '{}'", seed, quantity)
            }
        }
    }
}
