//! Configuration builder for neighbor search.

use tracing::{debug, instrument};

use warpnn_dtw::{BandConstraint, TimeSeries};

use crate::error::KnnError;
use crate::record::NeighborTable;
use crate::search;

/// Configuration for exact k-nearest-neighbor search.
///
/// Construct via [`KnnConfig::new`], then chain `with_*` methods to override
/// defaults.
///
/// # Defaults
///
/// | Parameter | Default |
/// |-----------|---------|
/// | `threads` | global rayon pool (all cores) |
#[derive(Debug, Clone)]
pub struct KnnConfig {
    k: usize,
    window_fraction: f64,
    threads: Option<usize>,
}

impl KnnConfig {
    /// Create a search configuration for `k` neighbors under a warping
    /// window of `window_fraction` of the sequence length.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::InvalidK`] | `k` is zero |
    /// | [`KnnError::InvalidWindowFraction`] | `window_fraction` outside (0, 1] |
    pub fn new(k: usize, window_fraction: f64) -> Result<Self, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK { k });
        }
        if !(window_fraction > 0.0 && window_fraction <= 1.0) {
            return Err(KnnError::InvalidWindowFraction { w: window_fraction });
        }
        Ok(Self {
            k,
            window_fraction,
            threads: None,
        })
    }

    /// Run the search on a dedicated worker pool of the given size instead
    /// of the process-global one.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Return the number of neighbors searched per point.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return the warping window fraction.
    #[must_use]
    pub fn window_fraction(&self) -> f64 {
        self.window_fraction
    }

    /// Return the configured worker count, if any.
    #[must_use]
    pub fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Return the warping radius this configuration derives for sequences of
    /// length `len`.
    #[must_use]
    pub fn radius_for(&self, len: usize) -> usize {
        (len as f64 * self.window_fraction).floor() as usize
    }

    /// Find the k nearest neighbors of every series in `series`.
    ///
    /// Query points are independent and processed in parallel; each task
    /// owns exactly one output row, so the result is deterministic and
    /// independent of worker count. An empty input yields an empty table.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`KnnError::LengthMismatch`] | Series lengths are not uniform |
    /// | [`KnnError::ThreadPool`] | The dedicated pool cannot be built |
    #[instrument(skip(self, series), fields(n = series.len(), k = self.k))]
    pub fn search(&self, series: &[TimeSeries]) -> Result<NeighborTable, KnnError> {
        let Some(first) = series.first() else {
            return Ok(NeighborTable::from_rows(Vec::new(), self.k));
        };

        let expected = first.len();
        for (index, s) in series.iter().enumerate() {
            if s.len() != expected {
                return Err(KnnError::LengthMismatch {
                    index,
                    expected,
                    got: s.len(),
                });
            }
        }

        let radius = self.radius_for(expected);
        let constraint = BandConstraint::SakoeChibaRadius(radius);
        debug!(radius, len = expected, "derived warping radius");

        match self.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| search::run(series, self.k, constraint)),
            None => search::run(series, self.k, constraint),
        }
    }
}
