//! Aggregation Module
//! Summary views over the unified table: top-N grouped averages, binned
//! frequency counts, wind-speed bucket totals and numeric range filtering.

use super::loader::COUNTRY_COL;
use polars::prelude::*;
use thiserror::Error;

/// Maximum number of rows returned by [`top_regions_table`].
pub const TOP_LIMIT: u32 = 10;

/// Default bin count for the pie-chart distributions.
pub const DEFAULT_BIN_COUNT: usize = 5;

/// Fixed wind-speed bucket edges (m/s) for the area chart; the last bucket
/// catches everything above 7.
pub const WIND_BUCKET_EDGES: [f64; 9] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 100.0];
pub const WIND_BUCKET_LABELS: [&str; 8] = ["0-1", "1-2", "2-3", "3-4", "4-5", "5-6", "6-7", "7+"];

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Required column '{0}' not found")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// One interval of a binned view: a human-readable label and its value
/// (a row count or a sum, depending on the producing function).
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub label: String,
    pub value: f64,
}

/// Outcome of an aggregation over an optional column.
///
/// An absent or entirely empty column yields `Empty` rather than an error so
/// the dashboard can skip the widget and keep rendering everything else.
/// Call sites must branch on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// Intervals in ascending order.
    Binned(Vec<Bin>),
    /// Nothing to render.
    Empty,
}

impl Distribution {
    pub fn bins(&self) -> &[Bin] {
        match self {
            Distribution::Binned(bins) => bins,
            Distribution::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Distribution::Empty)
    }
}

/// Non-null finite values of a numeric column, in row order. Empty when the
/// column is absent or not castable to floats.
pub fn numeric_values(df: &DataFrame, column: &str) -> Vec<f64> {
    let Ok(col) = df.column(column) else {
        return Vec::new();
    };
    let Ok(col) = col.cast(&DataType::Float64) else {
        return Vec::new();
    };
    let Ok(ca) = col.f64() else {
        return Vec::new();
    };
    ca.into_iter().flatten().filter(|v| v.is_finite()).collect()
}

/// Paired non-null values of two numeric columns, in row order.
pub fn xy_pairs(df: &DataFrame, x_col: &str, y_col: &str) -> Vec<[f64; 2]> {
    let (Ok(x), Ok(y)) = (df.column(x_col), df.column(y_col)) else {
        return Vec::new();
    };
    let (Ok(x), Ok(y)) = (x.cast(&DataType::Float64), y.cast(&DataType::Float64)) else {
        return Vec::new();
    };
    let (Ok(x), Ok(y)) = (x.f64(), y.f64()) else {
        return Vec::new();
    };

    x.into_iter()
        .zip(y.into_iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some([a, b]),
            _ => None,
        })
        .collect()
}

/// Observed (min, max) of a numeric column; `None` when the column is absent
/// or holds no values. Feeds the sidebar range sliders.
pub fn column_min_max(df: &DataFrame, column: &str) -> Option<(f64, f64)> {
    let values = numeric_values(df, column);
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Top wind speeds ranked by mean GHI: group rows by exact `ws` value,
/// average `ghi` per group, stable-sort descending and keep the top 10.
///
/// Both columns are required; the error names whichever is missing.
pub fn top_regions_table(df: &DataFrame) -> Result<DataFrame, AggregateError> {
    for required in ["ws", "ghi"] {
        if df.column(required).is_err() {
            return Err(AggregateError::MissingColumn(required.to_string()));
        }
    }

    let top = df
        .clone()
        .lazy()
        .group_by_stable([col("ws")])
        .agg([col("ghi").mean()])
        .sort(
            ["ghi"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .limit(TOP_LIMIT)
        .collect()?;
    Ok(top)
}

/// Mean GHI per country tag, in first-seen row order.
pub fn mean_ghi_by_country(df: &DataFrame) -> Result<DataFrame, AggregateError> {
    for required in [COUNTRY_COL, "ghi"] {
        if df.column(required).is_err() {
            return Err(AggregateError::MissingColumn(required.to_string()));
        }
    }

    let means = df
        .clone()
        .lazy()
        .group_by_stable([col(COUNTRY_COL)])
        .agg([col("ghi").mean()])
        .collect()?;
    Ok(means)
}

/// Bin a numeric column into `bin_count` equal-width intervals over its
/// observed range and count rows per interval.
///
/// Intervals are left-exclusive / right-inclusive, except the first which
/// includes its left bound, so every value lands in exactly one bucket.
/// All intervals are returned in ascending order, zero counts included.
pub fn bucketed_distribution(df: &DataFrame, column: &str, bin_count: usize) -> Distribution {
    if bin_count == 0 || df.column(column).is_err() {
        return Distribution::Empty;
    }

    let values = numeric_values(df, column);
    if values.is_empty() {
        return Distribution::Empty;
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= min {
        // Degenerate range: a single interval holding every value.
        return Distribution::Binned(vec![Bin {
            label: format!("{:.1} - {:.1}", min, max),
            value: values.len() as f64,
        }]);
    }

    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0u32; bin_count];
    for v in &values {
        let idx = (((v - min) / width).ceil() as usize).max(1) - 1;
        counts[idx.min(bin_count - 1)] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let lo = min + i as f64 * width;
            let hi = min + (i + 1) as f64 * width;
            Bin {
                label: format!("{:.1} - {:.1}", lo, hi),
                value: count as f64,
            }
        })
        .collect();
    Distribution::Binned(bins)
}

/// Total GHI per fixed wind-speed bucket, for the area chart. `Empty` when
/// either column is missing or no complete (ws, ghi) pair exists.
pub fn wind_bucket_ghi(df: &DataFrame) -> Distribution {
    let pairs = xy_pairs(df, "ws", "ghi");
    if pairs.is_empty() {
        return Distribution::Empty;
    }

    let mut totals = vec![0.0f64; WIND_BUCKET_LABELS.len()];
    for [ws, ghi] in pairs {
        for i in 0..WIND_BUCKET_LABELS.len() {
            let lo = WIND_BUCKET_EDGES[i];
            let hi = WIND_BUCKET_EDGES[i + 1];
            let in_bucket = ws <= hi && (ws > lo || (i == 0 && ws >= lo));
            if in_bucket {
                totals[i] += ghi;
                break;
            }
        }
    }

    let bins = WIND_BUCKET_LABELS
        .iter()
        .zip(totals)
        .map(|(label, value)| Bin {
            label: label.to_string(),
            value,
        })
        .collect();
    Distribution::Binned(bins)
}

/// Keep rows whose `column` value lies within `[lower, upper]`, inclusive on
/// both bounds. An absent column is a no-op: the input comes back unchanged.
/// Row order is preserved; the input table is never mutated.
pub fn filter_numeric_range(
    df: &DataFrame,
    column: &str,
    lower: f64,
    upper: f64,
) -> Result<DataFrame, AggregateError> {
    if df.column(column).is_err() {
        return Ok(df.clone());
    }

    let filtered = df
        .clone()
        .lazy()
        .filter(col(column).gt_eq(lit(lower)).and(col(column).lt_eq(lit(upper))))
        .collect()?;
    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ws_ghi_frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("ws".into(), vec![1.0f64, 1.0, 2.0, 3.0]),
            Column::new("ghi".into(), vec![10.0f64, 20.0, 5.0, 7.0]),
        ])
        .unwrap()
    }

    fn f64_at(df: &DataFrame, column: &str, idx: usize) -> f64 {
        df.column(column)
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .get(idx)
            .unwrap()
    }

    #[test]
    fn top_regions_ranks_wind_speeds_by_mean_ghi() {
        let top = top_regions_table(&ws_ghi_frame()).unwrap();

        assert!(top.height() <= TOP_LIMIT as usize);
        assert_eq!(f64_at(&top, "ws", 0), 1.0);
        assert_eq!(f64_at(&top, "ghi", 0), 15.0);

        let means: Vec<f64> = (0..top.height()).map(|i| f64_at(&top, "ghi", i)).collect();
        assert!(means.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn top_regions_names_the_missing_column() {
        let df = DataFrame::new(vec![Column::new("ws".into(), vec![1.0f64, 2.0])]).unwrap();
        match top_regions_table(&df) {
            Err(AggregateError::MissingColumn(name)) => assert_eq!(name, "ghi"),
            other => panic!("expected MissingColumn, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn bucketed_distribution_assigns_every_row_once() {
        let df = DataFrame::new(vec![Column::new(
            "ghi".into(),
            vec![0.0f64, 1.0, 2.0, 3.0, 4.0, 5.0],
        )])
        .unwrap();

        let dist = bucketed_distribution(&df, "ghi", 5);
        let bins = dist.bins();
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.iter().map(|b| b.value).sum::<f64>(), 6.0);
        // 0 and 1 both fall into the first (left-inclusive) interval.
        assert_eq!(bins[0].value, 2.0);
        assert_eq!(bins[0].label, "0.0 - 1.0");
    }

    #[test]
    fn bucketed_distribution_is_empty_for_absent_column() {
        let df = ws_ghi_frame();
        assert!(bucketed_distribution(&df, "tamb", 5).is_empty());
    }

    #[test]
    fn bucketed_distribution_is_empty_for_all_null_column() {
        let df = DataFrame::new(vec![Column::new(
            "tamb".into(),
            vec![Option::<f64>::None, None, None],
        )])
        .unwrap();
        assert!(bucketed_distribution(&df, "tamb", 5).is_empty());
    }

    #[test]
    fn bucketed_distribution_collapses_degenerate_range() {
        let df = DataFrame::new(vec![Column::new("rh".into(), vec![42.0f64, 42.0, 42.0])]).unwrap();
        let dist = bucketed_distribution(&df, "rh", 5);
        assert_eq!(dist.bins().len(), 1);
        assert_eq!(dist.bins()[0].value, 3.0);
    }

    #[test]
    fn filter_range_is_inclusive_on_both_bounds() {
        let df = DataFrame::new(vec![Column::new(
            "tamb".into(),
            vec![9.9f64, 10.0, 15.0, 20.0, 20.1],
        )])
        .unwrap();

        let filtered = filter_numeric_range(&df, "tamb", 10.0, 20.0).unwrap();
        assert_eq!(filtered.height(), 3);
        assert_eq!(f64_at(&filtered, "tamb", 0), 10.0);
        assert_eq!(f64_at(&filtered, "tamb", 2), 20.0);
    }

    #[test]
    fn filter_range_on_absent_column_is_a_noop() {
        let df = ws_ghi_frame();
        let filtered = filter_numeric_range(&df, "tamb", 0.0, 1.0).unwrap();
        assert!(filtered.equals(&df));
    }

    #[test]
    fn filter_range_with_observed_bounds_keeps_everything() {
        let df = ws_ghi_frame();
        let (min, max) = column_min_max(&df, "ghi").unwrap();
        let filtered = filter_numeric_range(&df, "ghi", min, max).unwrap();
        assert!(filtered.equals(&df));
    }

    #[test]
    fn wind_buckets_cover_low_and_high_speeds() {
        let df = DataFrame::new(vec![
            Column::new("ws".into(), vec![0.0f64, 0.5, 7.5]),
            Column::new("ghi".into(), vec![1.0f64, 2.0, 3.0]),
        ])
        .unwrap();

        let dist = wind_bucket_ghi(&df);
        let bins = dist.bins();
        assert_eq!(bins.len(), WIND_BUCKET_LABELS.len());
        assert_eq!(bins[0].label, "0-1");
        assert_eq!(bins[0].value, 3.0);
        assert_eq!(bins[7].label, "7+");
        assert_eq!(bins[7].value, 3.0);
    }

    #[test]
    fn mean_ghi_by_country_averages_per_tag() {
        let df = DataFrame::new(vec![
            Column::new("country".into(), vec!["Benin", "Benin", "Togo"]),
            Column::new("ghi".into(), vec![4.0f64, 6.0, 3.0]),
        ])
        .unwrap();

        let means = mean_ghi_by_country(&df).unwrap();
        assert_eq!(means.height(), 2);
        assert_eq!(f64_at(&means, "ghi", 0), 5.0);
        assert_eq!(f64_at(&means, "ghi", 1), 3.0);
    }

    #[test]
    fn column_min_max_is_none_for_absent_column() {
        assert!(column_min_max(&ws_ghi_frame(), "rh").is_none());
    }
}
