//! The parallel neighbor-search driver.

use rayon::prelude::*;
use tracing::debug;

use warpnn_dtw::{BandConstraint, LowerBoundFilter, SeriesEnvelope, TimeSeries};

use crate::error::KnnError;
use crate::record::{NeighborRecord, NeighborTable};

/// Run the search for every query index, in parallel.
///
/// Each task computes all k rounds for one query to completion and owns
/// exactly one row of the result; no mutable state crosses query indices.
pub(crate) fn run(
    series: &[TimeSeries],
    k: usize,
    constraint: BandConstraint,
) -> Result<NeighborTable, KnnError> {
    let rows = (0..series.len())
        .into_par_iter()
        .map(|query| search_query(series, query, k, constraint))
        .collect::<Result<Vec<_>, KnnError>>()?;

    debug!(n = rows.len(), "neighbor table assembled");
    Ok(NeighborTable::from_rows(rows, k))
}

/// Compute all k rounds for one query index.
///
/// Round r selects the best remaining candidate: a fresh filter session is
/// seeded at infinity, every non-excluded candidate is tested in ascending
/// index order, and the last candidate whose test strictly improved the
/// best-so-far wins the round. Ties keep the first candidate that reached
/// the value. The winner joins the exclusion mask so later rounds cannot
/// pick it again; a round with no winner records a missing neighbor with
/// the residual best-so-far.
///
/// Candidate envelopes are built lazily by the filter and cached across
/// rounds, so each candidate pays the O(n) build at most once per query.
fn search_query(
    series: &[TimeSeries],
    query: usize,
    k: usize,
    constraint: BandConstraint,
) -> Result<Vec<NeighborRecord>, KnnError> {
    let n = series.len();
    let mut excluded = vec![false; n];
    excluded[query] = true;

    let mut envelopes: Vec<Option<SeriesEnvelope>> = vec![None; n];
    let mut records = Vec::with_capacity(k);

    for _ in 0..k {
        let mut filter = LowerBoundFilter::new(series[query].as_view(), constraint);
        let mut best = filter.lowest_cost();
        let mut winner: Option<usize> = None;

        for (j, candidate) in series.iter().enumerate() {
            if excluded[j] {
                continue;
            }
            let cost = filter.test_cached(candidate.as_view(), &mut envelopes[j])?;
            if cost < best {
                best = cost;
                winner = Some(j);
            }
        }

        if let Some(j) = winner {
            excluded[j] = true;
        }
        records.push(NeighborRecord {
            query,
            neighbor: winner,
            distance: best,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KnnConfig;

    fn ts(values: Vec<f64>) -> TimeSeries {
        TimeSeries::new(values).expect("valid test series")
    }

    /// Three-point scenario with the full window: under squared-cost DTW the
    /// flat series is closer to the small bump (distance 1) than to the big
    /// one (distance sqrt(6)).
    #[test]
    fn three_point_scenario() {
        let series = vec![
            ts(vec![0.0, 0.0, 0.0, 0.0]),
            ts(vec![0.0, 1.0, 2.0, 1.0]),
            ts(vec![0.0, 0.0, 1.0, 0.0]),
        ];
        let table = KnnConfig::new(1, 1.0).unwrap().search(&series).unwrap();

        let first = table.row(0)[0];
        assert_eq!(first.neighbor, Some(2));
        assert!((first.distance - 1.0).abs() < 1e-12);

        // Point 1 is closer to the small bump than to the flat series.
        let second = table.row(1)[0];
        assert_eq!(second.neighbor, Some(2));
        assert!((second.distance - 2.0_f64.sqrt()).abs() < 1e-12);

        let third = table.row(2)[0];
        assert_eq!(third.neighbor, Some(0));
        assert!((third.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rounds_exclude_prior_winners_and_self() {
        let series: Vec<TimeSeries> = (0..6)
            .map(|i| ts(vec![i as f64, i as f64 + 0.5, i as f64]))
            .collect();
        let table = KnnConfig::new(4, 1.0).unwrap().search(&series).unwrap();

        for i in 0..series.len() {
            let mut seen = Vec::new();
            for record in table.row(i) {
                let j = record.neighbor.expect("6 points, 4 rounds: no sentinel");
                assert_ne!(j, i, "query {i} selected itself");
                assert!(!seen.contains(&j), "query {i} repeated neighbor {j}");
                seen.push(j);
            }
        }
    }

    #[test]
    fn round_distances_never_decrease_across_rounds() {
        // Each round removes the closest remaining candidate, so recorded
        // distances are non-decreasing per query.
        let series: Vec<TimeSeries> = (0..8)
            .map(|i| ts(vec![0.0, i as f64, 0.0, -(i as f64)]))
            .collect();
        let table = KnnConfig::new(5, 0.5).unwrap().search(&series).unwrap();

        for i in 0..series.len() {
            let distances: Vec<f64> = table.row(i).iter().map(|r| r.distance).collect();
            for pair in distances.windows(2) {
                assert!(pair[1] >= pair[0] - 1e-12, "query {i}: {distances:?}");
            }
        }
    }

    #[test]
    fn degenerate_rounds_record_sentinels() {
        let series = vec![ts(vec![0.0, 1.0]), ts(vec![1.0, 0.0])];
        let table = KnnConfig::new(3, 1.0).unwrap().search(&series).unwrap();

        for i in 0..2 {
            let row = table.row(i);
            assert_eq!(row.len(), 3);
            assert!(row[0].neighbor.is_some());
            // Only one real candidate exists; rounds 2 and 3 are sentinels.
            for record in &row[1..] {
                assert_eq!(record.neighbor, None);
                assert_eq!(record.distance, f64::INFINITY);
            }
        }
    }

    #[test]
    fn single_point_dataset() {
        let series = vec![ts(vec![1.0, 2.0, 3.0])];
        let table = KnnConfig::new(2, 0.5).unwrap().search(&series).unwrap();
        assert_eq!(table.len(), 1);
        for record in table.row(0) {
            assert_eq!(record.neighbor, None);
            assert_eq!(record.distance, f64::INFINITY);
        }
    }

    #[test]
    fn ties_keep_the_first_candidate() {
        // Candidates 1 and 2 are equidistant from the flat query; ascending
        // scan order must keep the first one encountered.
        let series = vec![
            ts(vec![0.0, 0.0, 0.0]),
            ts(vec![1.0, 0.0, 0.0]),
            ts(vec![0.0, 0.0, 1.0]),
        ];
        let table = KnnConfig::new(2, 1.0).unwrap().search(&series).unwrap();

        let row = table.row(0);
        assert_eq!(row[0].neighbor, Some(1));
        assert_eq!(row[1].neighbor, Some(2));
        assert!((row[0].distance - row[1].distance).abs() < 1e-12);
    }

    #[test]
    fn worker_count_does_not_change_results() {
        let series: Vec<TimeSeries> = (0..10)
            .map(|i| {
                let phase = i as f64 * 0.7;
                ts((0..12).map(|t| (t as f64 * 0.4 + phase).sin()).collect())
            })
            .collect();

        let serial = KnnConfig::new(3, 0.25)
            .unwrap()
            .with_threads(1)
            .search(&series)
            .unwrap();
        let parallel = KnnConfig::new(3, 0.25)
            .unwrap()
            .with_threads(4)
            .search(&series)
            .unwrap();

        for i in 0..series.len() {
            assert_eq!(serial.row(i), parallel.row(i), "query {i} diverged");
        }
    }
}
