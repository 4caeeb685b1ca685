//! Statistics Calculator Module
//! Handles descriptive statistics, histograms and grouped box statistics.

use crate::data::DataLoader;
use crate::error::Result;
use polars::prelude::*;
use statrs::statistics::Statistics;

/// Whisker reach as a multiple of the interquartile range.
pub const WHISKER_IQR: f64 = 1.5;

/// Descriptive statistics of one column (`describe()` layout).
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Default for DescriptiveStats {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl DescriptiveStats {
    /// Statistic names in display order.
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    /// Values in the order of [`Self::LABELS`].
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }

    /// Two-column frame: statistic name and value.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new("statistic".into(), Self::LABELS.to_vec()),
            Column::new(self.column.as_str().into(), self.values().to_vec()),
        ])?;
        Ok(df)
    }
}

/// Equal-width histogram of one column.
#[derive(Debug, Clone)]
pub struct Histogram {
    pub column: String,
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    pub fn bin_centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Box plot statistics for one group.
#[derive(Debug, Clone)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub whisker_low: f64,
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Number of rows per category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub group: String,
    pub count: usize,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(column: &str, values: &[f64]) -> DescriptiveStats {
        let n = values.len();
        if n == 0 {
            return DescriptiveStats {
                column: column.to_string(),
                ..DescriptiveStats::default()
            };
        }

        let sorted = Self::sorted(values);

        DescriptiveStats {
            column: column.to_string(),
            count: n,
            mean: values.iter().mean(),
            std: if n > 1 { values.iter().std_dev() } else { f64::NAN },
            min: sorted[0],
            q1: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q3: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Descriptive statistics of a named column, skipping nulls.
    pub fn describe_column(df: &DataFrame, column: &str) -> Result<DescriptiveStats> {
        let values = DataLoader::get_present_f64_values(df, column)?;
        Ok(Self::compute_descriptive_stats(column, &values))
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
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

    /// Bin values into `bins` equal-width bins over `[min, max]`.
    ///
    /// The last bin is closed on the right. A constant input spans
    /// `[v - 0.5, v + 0.5]`; an empty input spans `[0, 1]`.
    pub fn compute_histogram(column: &str, values: &[f64], bins: usize) -> Histogram {
        let bins = bins.max(1);
        let (lo, hi) = match values.iter().copied().fold(None, |acc: Option<(f64, f64)>, v| {
            Some(match acc {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            })
        }) {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => (lo - 0.5, hi + 0.5),
            Some(range) => range,
        };

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram {
            column: column.to_string(),
            edges,
            counts,
        }
    }

    /// Histogram of a named column, skipping nulls.
    pub fn histogram_column(df: &DataFrame, column: &str, bins: usize) -> Result<Histogram> {
        let values = DataLoader::get_present_f64_values(df, column)?;
        Ok(Self::compute_histogram(column, &values, bins))
    }

    /// Quartiles, whiskers and outliers of one group.
    pub fn compute_box_stats(group: &str, values: &[f64]) -> Option<BoxStats> {
        if values.is_empty() {
            return None;
        }

        let sorted = Self::sorted(values);
        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - WHISKER_IQR * iqr;
        let high_fence = q3 + WHISKER_IQR * iqr;

        let whisker_low = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let whisker_high = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxStats {
            group: group.to_string(),
            count: sorted.len(),
            mean: values.iter().mean(),
            q1,
            median,
            q3,
            whisker_low,
            whisker_high,
            outliers,
        })
    }

    /// Values of `value_col` per category of `group_col`, categories in
    /// first-appearance order. Rows with a null category are skipped.
    pub fn get_grouped_values(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<(String, Vec<f64>)>> {
        let groups = DataLoader::get_string_values(df, group_col)?;
        let values = DataLoader::get_f64_values(df, value_col)?;

        let mut grouped: Vec<(String, Vec<f64>)> = Vec::new();
        for (group, value) in groups.into_iter().zip(values) {
            let Some(group) = group else {
                continue;
            };
            let pos = match grouped.iter().position(|(g, _)| *g == group) {
                Some(pos) => pos,
                None => {
                    grouped.push((group, Vec::new()));
                    grouped.len() - 1
                }
            };
            if let Some(v) = value {
                grouped[pos].1.push(v);
            }
        }
        Ok(grouped)
    }

    /// Box statistics of `value_col` for every category of `group_col`.
    pub fn compute_grouped_box_stats(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<BoxStats>> {
        Ok(Self::get_grouped_values(df, group_col, value_col)?
            .iter()
            .filter_map(|(group, values)| Self::compute_box_stats(group, values))
            .collect())
    }

    /// Row count per category, in first-appearance order.
    pub fn count_by_group(df: &DataFrame, group_col: &str) -> Result<Vec<GroupCount>> {
        let mut counts: Vec<GroupCount> = Vec::new();
        for group in DataLoader::get_string_values(df, group_col)?.into_iter().flatten() {
            match counts.iter_mut().find(|c| c.group == group) {
                Some(entry) => entry.count += 1,
                None => counts.push(GroupCount { group, count: 1 }),
            }
        }
        Ok(counts)
    }
}
