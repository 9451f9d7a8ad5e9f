//! Error types for neighbor search.

use warpnn_dtw::DtwError;

/// Errors from neighbor search configuration and execution.
#[derive(Debug, thiserror::Error)]
pub enum KnnError {
    /// Returned when the requested neighbor count is zero.
    #[error("k must be at least 1, got {k}")]
    InvalidK {
        /// The invalid k value provided.
        k: usize,
    },

    /// Returned when the window fraction falls outside (0, 1].
    #[error("window fraction must be in (0, 1], got {w}")]
    InvalidWindowFraction {
        /// The invalid fraction provided.
        w: f64,
    },

    /// Returned when a series' length differs from the rest of the dataset.
    ///
    /// Uniform length is a dataset precondition; a violation fails the whole
    /// run rather than being silently coerced.
    #[error("series {index} has length {got}, expected {expected}")]
    LengthMismatch {
        /// Index of the offending series.
        index: usize,
        /// Length of the first series in the dataset.
        expected: usize,
        /// Length of the offending series.
        got: usize,
    },

    /// Returned when the dedicated worker pool cannot be built.
    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Wraps a filter contract violation surfaced during the scan.
    #[error("DTW filter error during search: {0}")]
    Dtw(#[from] DtwError),
}
