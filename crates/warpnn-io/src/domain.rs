//! Domain types for warpnn-io.

use warpnn_dtw::TimeSeries;

/// An ordered collection of equal-length time series.
///
/// The position of a series is its identity: neighbor records refer to
/// points by index into this collection.
#[derive(Debug)]
pub struct Dataset {
    /// Validated series in file order.
    pub series: Vec<TimeSeries>,
}

impl Dataset {
    /// Return the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Return true if the dataset holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Return the common sequence length, or 0 for an empty dataset.
    #[must_use]
    pub fn n_timesteps(&self) -> usize {
        self.series.first().map_or(0, TimeSeries::len)
    }
}
