//! Neighbor records and the per-query result table.

/// One (query, round) search result.
///
/// `neighbor` is `None` when the round found no usable candidate (fewer than
/// k + 1 points, or every remaining candidate pruned identically); the
/// residual best-so-far — infinity in that case — is still recorded as the
/// distance. Consumers must treat `None` as "no such neighbor", never as a
/// valid index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborRecord {
    /// Index of the query point.
    pub query: usize,
    /// Index of the selected neighbor, if any.
    pub neighbor: Option<usize>,
    /// Verified DTW distance to the neighbor, or the residual best-so-far.
    pub distance: f64,
}

/// Per-query neighbor lists, k records each, in round order.
///
/// Round order means increasingly close is not guaranteed sorted: each round
/// selects the best remaining candidate only.
#[derive(Debug, Clone)]
pub struct NeighborTable {
    k: usize,
    rows: Vec<Vec<NeighborRecord>>,
}

impl NeighborTable {
    pub(crate) fn from_rows(rows: Vec<Vec<NeighborRecord>>, k: usize) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == k));
        Self { k, rows }
    }

    /// Return the number of neighbors recorded per query.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Return the number of query points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Return true if the table holds no queries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Return the records for query `i`, in round order.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn row(&self, i: usize) -> &[NeighborRecord] {
        &self.rows[i]
    }

    /// Iterate over all records in (query, round) order.
    pub fn iter(&self) -> impl Iterator<Item = &NeighborRecord> + '_ {
        self.rows.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(query: usize, neighbor: Option<usize>, distance: f64) -> NeighborRecord {
        NeighborRecord {
            query,
            neighbor,
            distance,
        }
    }

    #[test]
    fn rows_and_iteration_order() {
        let table = NeighborTable::from_rows(
            vec![
                vec![record(0, Some(1), 1.0), record(0, Some(2), 2.0)],
                vec![record(1, Some(0), 1.0), record(1, None, f64::INFINITY)],
            ],
            2,
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.k(), 2);
        assert_eq!(table.row(0).len(), 2);

        let flat: Vec<_> = table.iter().collect();
        assert_eq!(flat.len(), 4);
        assert_eq!(flat[0].query, 0);
        assert_eq!(flat[3].query, 1);
        assert_eq!(flat[3].neighbor, None);
    }

    #[test]
    fn empty_table() {
        let table = NeighborTable::from_rows(Vec::new(), 3);
        assert!(table.is_empty());
        assert_eq!(table.iter().count(), 0);
    }
}
