//! Session State Module
//! Explicit, serializable selection state (country + numeric ranges) passed
//! by reference into the pure query functions. The unified table itself is
//! never mutated; applying the state always yields a fresh derived view.

use crate::data::aggregate::{filter_numeric_range, AggregateError};
use crate::data::COUNTRY_COL;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional numeric filter columns offered in the sidebar, with their
/// human-readable labels. Columns absent from the data are simply skipped.
pub const FILTER_COLUMNS: [(&str, &str); 4] = [
    ("moda", "ModA (W/m²)"),
    ("modb", "ModB (W/m²)"),
    ("tamb", "Ambient Temperature (°C)"),
    ("rh", "Relative Humidity (%)"),
];

/// Current user selections. Persisted across runs via eframe storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Selected country tag; must exactly match a tag produced by the loader.
    pub country: String,
    /// Inclusive (lower, upper) bounds per canonical column name.
    pub ranges: BTreeMap<String, (f64, f64)>,
}

impl SessionState {
    /// Derive the filtered view for the current selections: exact country
    /// match first, then every numeric range, inclusive on both bounds.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame, AggregateError> {
        let mut view = if self.country.is_empty() {
            df.clone()
        } else {
            df.clone()
                .lazy()
                .filter(col(COUNTRY_COL).eq(lit(self.country.clone())))
                .collect()?
        };

        for (column, (lower, upper)) in &self.ranges {
            view = filter_numeric_range(&view, column, *lower, *upper)?;
        }
        Ok(view)
    }

    pub fn set_range(&mut self, column: &str, lower: f64, upper: f64) {
        self.ranges.insert(column.to_string(), (lower, upper));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "country".into(),
                vec!["Benin", "Benin", "Togo", "Sierra Leone"],
            ),
            Column::new("ghi".into(), vec![5.0f64, 4.0, 3.0, 6.0]),
            Column::new("tamb".into(), vec![25.0f64, 31.0, 28.0, 24.0]),
        ])
        .unwrap()
    }

    #[test]
    fn apply_restricts_rows_to_the_selected_country() {
        let state = SessionState {
            country: "Benin".to_string(),
            ranges: BTreeMap::new(),
        };

        let view = state.apply(&sample_frame()).unwrap();
        assert_eq!(view.height(), 2);
    }

    #[test]
    fn apply_chains_country_and_range_filters() {
        let mut state = SessionState {
            country: "Benin".to_string(),
            ranges: BTreeMap::new(),
        };
        state.set_range("tamb", 20.0, 30.0);

        let view = state.apply(&sample_frame()).unwrap();
        assert_eq!(view.height(), 1);
    }

    #[test]
    fn default_state_leaves_the_table_untouched() {
        let df = sample_frame();
        let view = SessionState::default().apply(&df).unwrap();
        assert!(view.equals(&df));
    }
}
