//! Staged lower-bound filter for exact nearest-neighbor pruning.

use crate::constraint::BandConstraint;
use crate::dtw::Dtw;
use crate::envelope::SeriesEnvelope;
use crate::error::DtwError;
use crate::series::TimeSeriesView;

/// Early-abandoning exact DTW evaluator for one target series.
///
/// A filter owns its target, the target's envelope, and a monotonically
/// shrinking best-so-far distance. Candidates are run through a cascade of
/// progressively costlier stages, each able to stop early:
///
/// 1. forward LB_Keogh — candidate against the target envelope,
/// 2. reverse LB_Keogh — target against the candidate envelope,
/// 3. banded DTW with early abandoning at the current best-so-far.
///
/// Stage 1 is the dominant pruning path; both bound stages bail out of the
/// accumulation as soon as the running sum exceeds best-so-far squared.
/// A filter session lives for one search round and is then discarded.
pub struct LowerBoundFilter<'a> {
    target: TimeSeriesView<'a>,
    envelope: SeriesEnvelope,
    constraint: BandConstraint,
    best: f64,
    best_sq: f64,
}

impl<'a> LowerBoundFilter<'a> {
    /// Build a filter for `target`, computing its envelope under
    /// `constraint` and seeding best-so-far to infinity.
    #[must_use]
    pub fn new(target: TimeSeriesView<'a>, constraint: BandConstraint) -> Self {
        let envelope = SeriesEnvelope::compute(target, constraint);
        Self {
            target,
            envelope,
            constraint,
            best: f64::INFINITY,
            best_sq: f64::INFINITY,
        }
    }

    /// Seed best-so-far with an already-verified distance, tightening the
    /// pruning threshold from the first candidate on.
    #[must_use]
    pub fn with_best(mut self, best: f64) -> Self {
        self.best = best;
        self.best_sq = best * best;
        self
    }

    /// Return the current best-so-far distance.
    ///
    /// Non-increasing over the lifetime of the session.
    #[must_use]
    pub fn lowest_cost(&self) -> f64 {
        self.best
    }

    /// Return the band constraint the filter evaluates under.
    #[must_use]
    pub fn constraint(&self) -> BandConstraint {
        self.constraint
    }

    /// Evaluate `candidate` against the target.
    ///
    /// If the candidate's verified DTW distance beats the current
    /// best-so-far, best-so-far is updated and the new value returned;
    /// otherwise the unchanged best-so-far is returned. The reported value
    /// is never larger than the true windowed DTW distance of the pair.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::LengthMismatch`] | `candidate.len() != target.len()` |
    pub fn test(&mut self, candidate: TimeSeriesView<'_>) -> Result<f64, DtwError> {
        let mut scratch = None;
        self.test_cached(candidate, &mut scratch)
    }

    /// Like [`test`](Self::test), but reuses a caller-held envelope slot for
    /// the candidate.
    ///
    /// The slot is filled only when stage 2 is actually reached, so callers
    /// that keep one slot per candidate amortize the O(n) envelope build
    /// across repeated tests of the same candidate without paying for
    /// candidates that stage 1 prunes.
    pub fn test_cached(
        &mut self,
        candidate: TimeSeriesView<'_>,
        envelope_slot: &mut Option<SeriesEnvelope>,
    ) -> Result<f64, DtwError> {
        if candidate.len() != self.target.len() {
            return Err(DtwError::LengthMismatch {
                expected: self.target.len(),
                got: candidate.len(),
            });
        }

        // Stage 1: candidate against the target envelope.
        if !keogh_sq_within(candidate.as_slice(), &self.envelope, self.best_sq) {
            return Ok(self.best);
        }

        // Stage 2: target against the candidate envelope.
        let candidate_envelope = envelope_slot
            .get_or_insert_with(|| SeriesEnvelope::compute(candidate, self.constraint));
        if !keogh_sq_within(self.target.as_slice(), candidate_envelope, self.best_sq) {
            return Ok(self.best);
        }

        // Stage 3: full DTW, abandoning at the current best-so-far. An
        // abandoned computation reports infinity and claims no distance.
        let dist = Dtw::from_constraint(self.constraint)
            .distance_with_cutoff(candidate, self.target, self.best)
            .value();
        if dist < self.best {
            self.best = dist;
            self.best_sq = dist * dist;
        }
        Ok(self.best)
    }
}

/// Accumulate the squared LB_Keogh penalty of `query` against `envelope`,
/// returning `false` as soon as the running sum exceeds `cutoff_sq`.
fn keogh_sq_within(query: &[f64], envelope: &SeriesEnvelope, cutoff_sq: f64) -> bool {
    let mut sum_sq = 0.0;
    for (&q, (&u, &l)) in query
        .iter()
        .zip(envelope.upper().iter().zip(envelope.lower().iter()))
    {
        if q > u {
            let d = q - u;
            sum_sq += d * d;
        } else if q < l {
            let d = l - q;
            sum_sq += d * d;
        } else {
            continue;
        }
        if sum_sq > cutoff_sq {
            return false;
        }
    }
    true
}
