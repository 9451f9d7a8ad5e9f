//! File I/O for the warpnn pipeline: dataset loading and neighbor-table
//! serialization.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::Dataset;
pub use error::IoError;
pub use reader::{DatasetReader, read_neighbors};
pub use writer::NeighborWriter;
