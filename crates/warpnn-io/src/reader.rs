//! Whitespace-separated text readers.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use warpnn_dtw::TimeSeries;
use warpnn_knn::NeighborRecord;

use crate::domain::Dataset;
use crate::error::IoError;

/// Reads a dataset from a text file.
///
/// Expected format: one sequence per line, values separated by whitespace,
/// parsed as floating-point numbers. Line order defines point identity.
///
/// Reading conventions:
/// - a token that fails to parse ends its row; the values before it stand,
/// - lines yielding no values are skipped,
/// - non-finite values and ragged row lengths fail the whole load.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File missing or unreadable |
/// | [`IoError::ReadFailed`] | Read error partway through |
/// | [`IoError::EmptyDataset`] | No usable sequences |
/// | [`IoError::NonFiniteValue`] | A value is NaN or infinite |
/// | [`IoError::InconsistentRowLength`] | Row length differs from the first row |
pub struct DatasetReader {
    path: PathBuf,
}

impl DatasetReader {
    /// Create a reader for the given dataset path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the dataset.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Dataset, IoError> {
        let file = File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        let mut series: Vec<TimeSeries> = Vec::new();
        let mut expected_len: Option<usize> = None;

        for (line_index, line_result) in BufReader::new(file).lines().enumerate() {
            let line = line_result.map_err(|e| IoError::ReadFailed {
                path: self.path.clone(),
                source: e,
            })?;

            let mut values = Vec::new();
            for token in line.split_whitespace() {
                // A malformed token ends the row; values before it stand.
                let Ok(value) = token.parse::<f64>() else {
                    break;
                };
                if !value.is_finite() {
                    return Err(IoError::NonFiniteValue {
                        path: self.path.clone(),
                        line: line_index + 1,
                        raw: token.to_string(),
                    });
                }
                values.push(value);
            }

            if values.is_empty() {
                debug!(line = line_index + 1, "skipping line with no values");
                continue;
            }

            match expected_len {
                Some(expected) if values.len() != expected => {
                    return Err(IoError::InconsistentRowLength {
                        path: self.path.clone(),
                        line: line_index + 1,
                        expected,
                        got: values.len(),
                    });
                }
                Some(_) => {}
                None => expected_len = Some(values.len()),
            }

            // Non-empty and finite by the checks above; kept as a guard.
            let ts = TimeSeries::new(values).map_err(|_| IoError::EmptyDataset {
                path: self.path.clone(),
            })?;
            series.push(ts);
        }

        if series.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        info!(
            n_points = series.len(),
            n_timesteps = series.first().map_or(0, TimeSeries::len),
            "dataset loaded"
        );
        Ok(Dataset { series })
    }
}

/// Re-parse a neighbor file written by
/// [`NeighborWriter`](crate::NeighborWriter).
///
/// Each line is `i, j, weight`; `j = -1` decodes to a missing neighbor.
/// Blank lines are ignored.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File missing or unreadable |
/// | [`IoError::ReadFailed`] | Read error partway through |
/// | [`IoError::MalformedRecord`] | A line does not parse as `i, j, weight` |
pub fn read_neighbors(path: &Path) -> Result<Vec<NeighborRecord>, IoError> {
    let file = File::open(path).map_err(|e| IoError::FileNotFound {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut records = Vec::new();
    for (line_index, line_result) in BufReader::new(file).lines().enumerate() {
        let line = line_result.map_err(|e| IoError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let lineno = line_index + 1;

        let mut fields = line.split(',');
        let query = fields
            .next()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .ok_or_else(|| malformed(path, lineno))?;
        let neighbor = fields
            .next()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| malformed(path, lineno))?;
        let distance = fields
            .next()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .ok_or_else(|| malformed(path, lineno))?;
        if fields.next().is_some() {
            return Err(malformed(path, lineno));
        }

        let neighbor = match neighbor {
            -1 => None,
            j if j >= 0 => Some(j as usize),
            _ => return Err(malformed(path, lineno)),
        };

        records.push(NeighborRecord {
            query,
            neighbor,
            distance,
        });
    }

    Ok(records)
}

fn malformed(path: &Path, line: usize) -> IoError {
    IoError::MalformedRecord {
        path: path.to_path_buf(),
        line,
    }
}
