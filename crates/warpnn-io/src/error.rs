//! I/O error types for warpnn-io.

use std::path::PathBuf;

/// Errors from dataset loading and neighbor-table serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("cannot open {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when reading from an open file fails midway.
    #[error("read error in {path}")]
    ReadFailed {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the file contains no usable sequences.
    #[error("empty dataset in {path}")]
    EmptyDataset {
        /// Path to the dataset file.
        path: PathBuf,
    },

    /// Returned when a value parses but is NaN or infinite.
    #[error("non-finite value in {path} at line {line}: \"{raw}\"")]
    NonFiniteValue {
        /// Path to the dataset file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// The offending token.
        raw: String,
    },

    /// Returned when a row's length differs from the first row's.
    #[error("line {line} of {path} has {got} values, expected {expected}")]
    InconsistentRowLength {
        /// Path to the dataset file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Length of the first sequence.
        expected: usize,
        /// Length of the offending sequence.
        got: usize,
    },

    /// Returned when the neighbor file cannot be written.
    #[error("cannot write {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a neighbor-file line does not parse as `i, j, weight`.
    #[error("malformed neighbor record in {path} at line {line}")]
    MalformedRecord {
        /// Path to the neighbor file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
    },
}
