//! Neighbor-table text writer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use warpnn_knn::NeighborTable;

use crate::error::IoError;

/// Writes a [`NeighborTable`] as text, one `i, j, weight` line per
/// (query, round) record in round order.
///
/// A missing neighbor is encoded as `j = -1` with its residual distance
/// (`inf` when nothing was found). Weights use Rust's shortest round-trip
/// float formatting, so re-parsing the file reproduces the exact values.
pub struct NeighborWriter {
    path: PathBuf,
}

impl NeighborWriter {
    /// Create a writer targeting an explicit output path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a writer using the conventional derived name
    /// `<input>_neighbors_<k>.txt`, appended to the full input filename.
    pub fn for_dataset(input: &Path, k: usize) -> Self {
        let mut name = input.as_os_str().to_os_string();
        name.push(format!("_neighbors_{k}.txt"));
        Self {
            path: PathBuf::from(name),
        }
    }

    /// Return the output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the table.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(path = %self.path.display()))]
    pub fn write(&self, table: &NeighborTable) -> Result<(), IoError> {
        let mut out = String::new();
        for record in table.iter() {
            let j = record.neighbor.map_or(-1, |j| j as i64);
            out.push_str(&format!("{}, {}, {}\n", record.query, j, record.distance));
        }

        fs::write(&self.path, out).map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;

        info!(records = table.iter().count(), "neighbor table written");
        Ok(())
    }
}
