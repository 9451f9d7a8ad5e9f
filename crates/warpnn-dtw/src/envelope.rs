//! Sliding-window envelopes and the LB_Keogh lower bound.

use std::collections::VecDeque;

use crate::constraint::BandConstraint;
use crate::series::TimeSeriesView;

/// Precomputed upper/lower warping envelope for a time series.
///
/// For each step `i`, `upper[i]` is the maximum of the series over
/// `|i - j| <= radius` and `lower[i]` the minimum, clamped to the sequence
/// bounds. For [`BandConstraint::Unconstrained`] the envelope degenerates to
/// the global extremes. Derived data: recomputed whenever a filter's target
/// changes, never mutated in place.
#[derive(Debug, Clone)]
pub struct SeriesEnvelope {
    upper: Vec<f64>,
    lower: Vec<f64>,
}

impl SeriesEnvelope {
    /// Compute both envelopes in O(n) total using monotonic deques.
    ///
    /// The deques hold indices: the max deque keeps values in decreasing
    /// order, the min deque in increasing order, so the current window
    /// extremum is always at the front. Each index enters and leaves each
    /// deque at most once, which is what keeps the whole pass O(n) instead
    /// of O(n * r).
    #[must_use]
    pub fn compute(series: TimeSeriesView<'_>, constraint: BandConstraint) -> Self {
        let data = series.as_slice();
        let n = data.len();
        let radius = match constraint {
            BandConstraint::Unconstrained => n,
            BandConstraint::SakoeChibaRadius(r) => r,
        };

        let mut upper = vec![0.0_f64; n];
        let mut lower = vec![0.0_f64; n];
        let mut max_idx: VecDeque<usize> = VecDeque::new();
        let mut min_idx: VecDeque<usize> = VecDeque::new();
        let mut frontier: usize = 0;

        for i in 0..n {
            // Grow the window on the right up to i + radius.
            let right = (i + radius).min(n - 1);
            while frontier <= right {
                while max_idx.back().is_some_and(|&b| data[b] <= data[frontier]) {
                    max_idx.pop_back();
                }
                max_idx.push_back(frontier);

                while min_idx.back().is_some_and(|&b| data[b] >= data[frontier]) {
                    min_idx.pop_back();
                }
                min_idx.push_back(frontier);

                frontier += 1;
            }

            // Shrink on the left below i - radius.
            let left = i.saturating_sub(radius);
            while max_idx.front().is_some_and(|&f| f < left) {
                max_idx.pop_front();
            }
            while min_idx.front().is_some_and(|&f| f < left) {
                min_idx.pop_front();
            }

            // Index i itself is always inside the window, so neither deque
            // can be empty here.
            upper[i] = data[*max_idx.front().expect("window contains i")];
            lower[i] = data[*min_idx.front().expect("window contains i")];
        }

        Self { upper, lower }
    }

    /// Return the upper envelope values.
    #[must_use]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Return the lower envelope values.
    #[must_use]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Return the envelope length (same as the source series).
    #[must_use]
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    /// Return true if the envelope is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }
}

/// Compute the LB_Keogh lower bound on windowed DTW distance.
///
/// Accumulates the squared gap between each `query` value and the envelope
/// of the other series wherever the value falls outside it, and returns the
/// square root of the total. Valid lower bound:
/// `lb_keogh(q, envelope(c, r)) <= dtw(q, c, r)`.
#[must_use]
pub fn lb_keogh(query: &[f64], envelope: &SeriesEnvelope) -> f64 {
    let sum_sq: f64 = query
        .iter()
        .zip(envelope.upper.iter().zip(envelope.lower.iter()))
        .map(|(&q, (&u, &l))| {
            if q > u {
                let d = q - u;
                d * d
            } else if q < l {
                let d = l - q;
                d * d
            } else {
                0.0
            }
        })
        .sum();
    sum_sq.sqrt()
}
