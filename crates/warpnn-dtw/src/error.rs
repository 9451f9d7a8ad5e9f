//! Error types for series validation and filter preconditions.

/// Errors from time series validation and DTW filter evaluation.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when an empty slice is provided as a time series.
    #[error("time series must be non-empty")]
    EmptySeries,

    /// Returned when a time series contains NaN, infinity, or negative infinity.
    #[error("time series contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when a candidate's length differs from the filter target's.
    ///
    /// Length mismatch is a contract violation, not a recoverable condition:
    /// it indicates inconsistent sequence lengths in the dataset itself.
    #[error("candidate length {got} does not match target length {expected}")]
    LengthMismatch {
        /// Length of the filter's target series.
        expected: usize,
        /// Length of the offending candidate.
        got: usize,
    },
}
