//! Charts module - dashboard chart widgets

mod plotter;

pub use plotter::{ChartPlotter, AREA_COLOR, BAR_COLOR, HISTOGRAM_COLOR};
