//! Statistics Calculator Module
//! Descriptive statistics, box-plot summaries and correlations for the dashboard.

use crate::data::PriceTable;
use rayon::prelude::*;
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Five-number summary drawn as a box plot (whiskers at 1.5 IQR).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

/// Statistics for a single column, nulls excluded.
#[derive(Debug, Clone)]
pub struct SeriesStats {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub variance: f64,
    pub p95: f64,
    pub p05: f64,
    pub box_summary: Option<BoxSummary>,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self {
            name: String::new(),
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            variance: f64::NAN,
            p95: f64::NAN,
            p05: f64::NAN,
            box_summary: None,
        }
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> SeriesStats {
        let n = values.len();
        if n == 0 {
            return SeriesStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = Self::percentile(&sorted, 50.0);

        let variance = if n > 1 {
            values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            0.0
        };

        SeriesStats {
            name: String::new(),
            count: n,
            mean,
            median,
            std: variance.sqrt(),
            variance,
            p95: Self::percentile(&sorted, 95.0),
            p05: Self::percentile(&sorted, 5.0),
            box_summary: Self::box_summary(&sorted),
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Quartiles plus whiskers reaching the most extreme points within 1.5 IQR.
    pub fn box_summary(sorted_values: &[f64]) -> Option<BoxSummary> {
        if sorted_values.is_empty() {
            return None;
        }

        let q1 = Self::percentile(sorted_values, 25.0);
        let median = Self::percentile(sorted_values, 50.0);
        let q3 = Self::percentile(sorted_values, 75.0);
        let iqr = q3 - q1;

        let lower_whisker = sorted_values
            .iter()
            .copied()
            .find(|&v| v >= q1 - 1.5 * iqr)
            .unwrap_or(q1);
        let upper_whisker = sorted_values
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + 1.5 * iqr)
            .unwrap_or(q3);

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }

    /// Pearson correlation over rows where both values are present and finite.
    ///
    /// `None` with fewer than two complete pairs or a constant side.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
        let (xs, ys): (Vec<f64>, Vec<f64>) = x
            .iter()
            .zip(y)
            .filter_map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
                _ => None,
            })
            .unzip();

        if xs.len() < 2 {
            return None;
        }

        let std_x = xs.iter().std_dev();
        let std_y = ys.iter().std_dev();
        if std_x == 0.0 || std_y == 0.0 {
            return None;
        }

        let r = xs.iter().covariance(ys.iter()) / (std_x * std_y);
        r.is_finite().then_some(r)
    }

    /// Non-null, finite values of one column.
    pub fn column_values(table: &PriceTable, column: &str) -> Vec<f64> {
        table
            .values(column)
            .map(|values| {
                values
                    .into_iter()
                    .flatten()
                    .filter(|v| v.is_finite())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Compute statistics for several columns in parallel.
    /// Columns absent from the table are skipped.
    pub fn compute_all_stats_parallel(
        table: &PriceTable,
        columns: &[&str],
    ) -> HashMap<String, SeriesStats> {
        columns
            .par_iter()
            .filter(|column| table.has_column(column))
            .map(|&column| {
                let values = Self::column_values(table, column);
                let mut stats = Self::compute_descriptive_stats(&values);
                stats.name = column.to_string();
                (column.to_string(), stats)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptive_stats_match_numpy() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.median, 2.5);
        assert!((stats.variance - 5.0 / 3.0).abs() < 1e-12);
        assert!((stats.p95 - 3.85).abs() < 1e-12);
        assert!((stats.p05 - 1.15).abs() < 1e-12);
    }

    #[test]
    fn empty_input_gives_nan_stats() {
        let stats = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
        assert!(stats.box_summary.is_none());
    }

    #[test]
    fn box_whiskers_stop_inside_fences() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = StatsCalculator::box_summary(&sorted).unwrap();
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
    }

    #[test]
    fn pearson_uses_complete_pairs_only() {
        let x = [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)];
        let y = [Some(2.0), Some(4.0), Some(100.0), Some(6.0), None];
        let r = StatsCalculator::pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12);

        let inverse = [Some(3.0), Some(2.0), None, Some(1.0), None];
        let r = StatsCalculator::pearson(&x, &inverse).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_needs_variation() {
        let x = [Some(1.0), Some(1.0), Some(1.0)];
        let y = [Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(StatsCalculator::pearson(&x, &y), None);
        assert_eq!(StatsCalculator::pearson(&[Some(1.0)], &[Some(2.0)]), None);
    }
}
