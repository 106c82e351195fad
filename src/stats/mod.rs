//! Stats module - summary statistics for the metric cards and trendlines

mod summary;

pub use summary::{linear_fit, ColumnSummary};
