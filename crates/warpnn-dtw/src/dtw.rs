//! Banded DTW distance with optional early abandoning.

use tracing::instrument;

use crate::constraint::BandConstraint;
use crate::distance::DtwDistance;
use crate::series::TimeSeriesView;

/// Immutable DTW configuration. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtw {
    constraint: BandConstraint,
}

impl Dtw {
    /// Create an unconstrained DTW calculator.
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            constraint: BandConstraint::Unconstrained,
        }
    }

    /// Create a DTW calculator with a Sakoe-Chiba band constraint.
    #[must_use]
    pub fn with_sakoe_chiba(radius: usize) -> Self {
        Self {
            constraint: BandConstraint::SakoeChibaRadius(radius),
        }
    }

    /// Create a DTW calculator from an existing [`BandConstraint`].
    #[must_use]
    pub fn from_constraint(constraint: BandConstraint) -> Self {
        Self { constraint }
    }

    /// Return the band constraint configuration.
    #[must_use]
    pub fn constraint(&self) -> BandConstraint {
        self.constraint
    }

    /// Compute the DTW distance between two time series.
    ///
    /// Uses a rolling two-row buffer rather than the full cost matrix:
    /// O(n * bw) time and O(bw) space, where `bw` is the band width
    /// (`m` for unconstrained, `2r+1` for Sakoe-Chiba radius `r`). The step
    /// cost is the squared difference; the returned distance is the square
    /// root of the accumulated cost.
    ///
    /// With a band constraint the final cell `(n-1, m-1)` must lie inside the
    /// band; for equal-length series this always holds.
    #[must_use]
    #[instrument(skip(a, b))]
    pub fn distance(&self, a: TimeSeriesView<'_>, b: TimeSeriesView<'_>) -> DtwDistance {
        let sq = self.banded_sq(a.as_slice(), b.as_slice(), None);
        DtwDistance::new(sq.sqrt())
    }

    /// Compute the DTW distance, abandoning early once it provably exceeds
    /// `cutoff`.
    ///
    /// Returns [`DtwDistance::INFINITY`] as soon as the minimum accumulated
    /// cost of any row exceeds `cutoff` squared. This is exact: whenever a
    /// finite value is returned it equals [`Dtw::distance`] on the same pair.
    /// The cutoff is in distance space, not squared.
    #[must_use]
    pub fn distance_with_cutoff(
        &self,
        a: TimeSeriesView<'_>,
        b: TimeSeriesView<'_>,
        cutoff: f64,
    ) -> DtwDistance {
        let sq = self.banded_sq(a.as_slice(), b.as_slice(), Some(cutoff * cutoff));
        DtwDistance::new(sq.sqrt())
    }

    /// Rolling banded DP over the squared-cost recurrence.
    ///
    /// Row buffers carry an INF sentinel slot on each side; a predecessor
    /// that falls outside the band reads INF through the sentinels instead
    /// of being special-cased. Column `j` of a row whose band starts at
    /// `start` lives at local slot `j - start + 1`.
    ///
    /// Returns the accumulated squared cost at `(n-1, m-1)`, or
    /// `f64::INFINITY` once `cutoff_sq` proves the pair cannot beat the
    /// cutoff.
    fn banded_sq(&self, a: &[f64], b: &[f64], cutoff_sq: Option<f64>) -> f64 {
        let n = a.len();
        let m = b.len();
        let width = self.constraint.band_width(n, m) + 2;

        let mut prev = vec![f64::INFINITY; width];
        let mut curr = vec![f64::INFINITY; width];
        let mut prev_start = 0usize;

        for i in 0..n {
            let cols = self.constraint.column_range(i, m);
            let start = cols.start;
            curr.fill(f64::INFINITY);
            let mut row_min = f64::INFINITY;

            for j in cols {
                let d = a[i] - b[j];
                let step = d * d;
                let slot = j - start + 1;

                let best_prev = if i == 0 {
                    // First row: only the left neighbor exists, and (0, 0)
                    // has no predecessor at all.
                    if j == 0 { 0.0 } else { curr[slot - 1] }
                } else {
                    // Band starts are non-decreasing, so prev_start <= j and
                    // j - prev_start + 1 < width: both prev-row reads stay in
                    // the buffer, landing on a sentinel when out of band.
                    let above = prev[j - prev_start + 1];
                    let diag = if j == 0 {
                        f64::INFINITY
                    } else {
                        prev[j - prev_start]
                    };
                    curr[slot - 1].min(above).min(diag)
                };

                let total = step + best_prev;
                curr[slot] = total;
                row_min = row_min.min(total);
            }

            // Every admissible path visits exactly one cell per row, so the
            // row minimum bounds the final cost from below. The last row is
            // excluded: its minimum may sit in a cell the path cannot end
            // in; the final cell is checked after the loop instead.
            if let Some(c) = cutoff_sq
                && i + 1 < n
                && row_min > c
            {
                return f64::INFINITY;
            }

            prev_start = start;
            std::mem::swap(&mut prev, &mut curr);
        }

        // After the final swap `prev` holds the last completed row.
        let final_start = self.constraint.column_range(n - 1, m).start;
        let final_sq = prev[(m - 1) - final_start + 1];

        if let Some(c) = cutoff_sq
            && final_sq > c
        {
            return f64::INFINITY;
        }

        final_sq
    }
}
