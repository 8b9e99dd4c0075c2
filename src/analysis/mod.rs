//! Analysis of dumped samples
//!
//! - [`averaging`] - Block averaging onto a fixed time grid
//! - [`stats`] - Summary statistics of a reduced series
//! - [`export`] - CSV export

pub mod averaging;
pub mod export;
pub mod stats;

pub use averaging::reduce;
pub use export::{export_csv, write_csv};
pub use stats::SeriesStatistics;
