//! Summary Statistics Module
//! Descriptive statistics over extracted column values, plus the
//! least-squares fit behind the scatter trendlines.

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std: f64,
}

impl Default for ColumnSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            std: f64::NAN,
        }
    }
}

impl ColumnSummary {
    /// Compute descriptive statistics for a slice of values.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        Self {
            count: n,
            mean,
            min,
            max,
            std: variance.sqrt(),
        }
    }
}

/// Ordinary least-squares fit over (x, y) pairs, returning (slope, intercept).
/// `None` when fewer than two points exist or x has no spread.
pub fn linear_fit(points: &[[f64; 2]]) -> Option<(f64, f64)> {
    let n = points.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / nf;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / nf;

    let sxx = points.iter().map(|p| (p[0] - mean_x).powi(2)).sum::<f64>();
    if sxx == 0.0 {
        return None;
    }
    let sxy = points
        .iter()
        .map(|p| (p[0] - mean_x) * (p[1] - mean_y))
        .sum::<f64>();

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_matches_hand_computed_values() {
        let s = ColumnSummary::from_values(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert!((s.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn empty_slice_yields_nan_stats() {
        let s = ColumnSummary::from_values(&[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
    }

    #[test]
    fn linear_fit_recovers_an_exact_line() {
        let points = [[0.0, 1.0], [1.0, 3.0], [2.0, 5.0]];
        let (slope, intercept) = linear_fit(&points).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn linear_fit_rejects_degenerate_input() {
        assert!(linear_fit(&[[1.0, 2.0]]).is_none());
        assert!(linear_fit(&[[1.0, 2.0], [1.0, 4.0]]).is_none());
    }
}
