//! Windowed DTW distance and lower-bound pruning.
//!
//! Pure math library — zero I/O. Provides Dynamic Time Warping distance
//! computation under an optional Sakoe-Chiba band, per-series envelopes,
//! the LB_Keogh lower bound, and the staged early-abandoning filter used
//! for exact nearest-neighbor search.

mod constraint;
mod distance;
mod dtw;
mod envelope;
mod error;
mod filter;
mod series;

pub use constraint::BandConstraint;
pub use distance::DtwDistance;
pub use dtw::Dtw;
pub use envelope::{SeriesEnvelope, lb_keogh};
pub use error::DtwError;
pub use filter::LowerBoundFilter;
pub use series::{TimeSeries, TimeSeriesView};
