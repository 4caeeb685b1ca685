//! Builds every analysis of the cleaned review table in one pass.

use crate::config::EdaConfig;
use crate::data::{DataCleaner, DataLoader};
use crate::error::Result;
use crate::stats::correlation::correlation_matrix;
use crate::stats::density::estimate_density;
use crate::stats::{
    BoxStats, CorrelationMatrix, DatasetSummary, DensityCurve, DescriptiveStats, GroupCount,
    Histogram, StatsCalculator,
};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Label of the correlation matrix over every review.
pub const ALL_REVIEWS: &str = "All reviews";

/// Counts and box statistics of one categorical column.
#[derive(Debug, Clone)]
pub struct GroupAnalysis {
    pub column: String,
    pub value_column: String,
    pub counts: Vec<GroupCount>,
    pub boxes: Vec<BoxStats>,
}

impl GroupAnalysis {
    pub fn build(df: &DataFrame, column: &str, value_column: &str) -> Result<Self> {
        Ok(Self {
            column: column.to_string(),
            value_column: value_column.to_string(),
            counts: StatsCalculator::count_by_group(df, column)?,
            boxes: StatsCalculator::compute_grouped_box_stats(df, column, value_column)?,
        })
    }

    /// Category with the most rows.
    pub fn largest_group(&self) -> Option<&GroupCount> {
        self.counts.iter().max_by_key(|c| c.count)
    }
}

/// Density curves of several columns over one processing-method subset.
#[derive(Debug, Clone)]
pub struct DensityComparison {
    pub subset: String,
    pub rows: usize,
    pub curves: Vec<DensityCurve>,
}

/// Everything the console, the viewer and the exporter present.
#[derive(Debug, Clone)]
pub struct EdaReport {
    pub source: String,
    pub rows: usize,
    pub columns: Vec<String>,
    /// Rows flagged as altitude outliers before patching.
    pub suspect_rows: Vec<usize>,
    pub summary: DatasetSummary,
    pub score_histogram: Histogram,
    pub score_stats: DescriptiveStats,
    pub histograms: Vec<Histogram>,
    pub correlation: CorrelationMatrix,
    pub countries: Vec<String>,
    pub by_country: GroupAnalysis,
    pub by_processing: GroupAnalysis,
    pub subset_correlations: Vec<CorrelationMatrix>,
    pub densities: Vec<DensityComparison>,
}

impl EdaReport {
    /// Load, clean and analyse a CSV file.
    pub fn from_csv(path: impl AsRef<Path>, config: &EdaConfig) -> Result<(DataFrame, Self)> {
        let path = path.as_ref();
        let raw = DataLoader::load_csv(path)?;
        Self::from_raw(raw, &path.display().to_string(), config)
    }

    /// Clean and analyse a table straight from the loader.
    ///
    /// Returns the cleaned table with the report.
    pub fn from_raw(raw: DataFrame, source: &str, config: &EdaConfig) -> Result<(DataFrame, Self)> {
        let (df, suspect_rows) = DataCleaner::clean_with_inspection(raw, config)?;
        let mut report = Self::build(&df, config)?;
        report.source = source.to_string();
        report.suspect_rows = suspect_rows;
        Ok((df, report))
    }

    /// Run every analysis over a cleaned table.
    pub fn build(df: &DataFrame, config: &EdaConfig) -> Result<Self> {
        info!("Analysing {} reviews", df.height());

        let summary = DatasetSummary::from_dataframe(df)?;
        let score_histogram =
            StatsCalculator::histogram_column(df, &config.score_column, config.score_bins)?;
        let score_stats = StatsCalculator::describe_column(df, &config.score_column)?;

        let histograms = config
            .histogram_columns
            .iter()
            .map(|c| StatsCalculator::histogram_column(df, c, config.histogram_bins))
            .collect::<Result<Vec<_>>>()?;

        let correlation = correlation_matrix(df, &config.correlation_columns, ALL_REVIEWS)?;

        let countries = DataLoader::get_unique_values(df, &config.country_column)?;
        let by_country = GroupAnalysis::build(df, &config.country_column, &config.box_value_column)?;
        let by_processing =
            GroupAnalysis::build(df, &config.processing_column, &config.box_value_column)?;

        let mut subset_correlations = Vec::with_capacity(config.subsets.len());
        let mut densities = Vec::with_capacity(config.subsets.len());
        for subset in &config.subsets {
            let rows = DataLoader::filter_equals(df, &config.processing_column, subset)?;
            debug!("Subset '{}' has {} rows", subset, rows.height());
            if rows.height() == 0 {
                warn!("No reviews processed as '{}'", subset);
            }

            subset_correlations.push(correlation_matrix(
                &rows,
                &config.subset_correlation_columns,
                subset,
            )?);
            densities.push(Self::density_comparison(&rows, subset, config)?);
        }

        Ok(Self {
            source: String::new(),
            rows: df.height(),
            columns: DataLoader::get_columns(df),
            suspect_rows: Vec::new(),
            summary,
            score_histogram,
            score_stats,
            histograms,
            correlation,
            countries,
            by_country,
            by_processing,
            subset_correlations,
            densities,
        })
    }

    fn density_comparison(rows: &DataFrame, subset: &str, config: &EdaConfig) -> Result<DensityComparison> {
        let mut curves = Vec::with_capacity(config.density_columns.len());
        for column in &config.density_columns {
            let values = DataLoader::get_present_f64_values(rows, column)?;
            let label = column.replace('_', " ");
            match estimate_density(&label, &values, config.density_grid_size) {
                Some(curve) => curves.push(curve),
                None => warn!("Skipping density of {} for '{}': not enough spread", column, subset),
            }
        }
        Ok(DensityComparison {
            subset: subset.to_string(),
            rows: rows.height(),
            curves,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> EdaConfig {
        EdaConfig {
            histogram_columns: vec!["aroma".to_string()],
            correlation_columns: vec!["aroma".to_string(), "clean_cup".to_string()],
            subset_correlation_columns: vec!["aroma".to_string(), "uniformity".to_string()],
            ..EdaConfig::default()
        }
    }

    fn reviews() -> DataFrame {
        df!(
            "country_of_origin" => ["Ethiopia", "Guatemala", "Ethiopia", "Brazil", "Guatemala", "Brazil"],
            "processing_method" => ["Washed / Wet", "Washed / Wet", "Natural / Dry", "Natural / Dry", "Washed / Wet", "Natural / Dry"],
            "total_cup_points" => [90.58, 82.0, 88.83, 80.5, 81.25, 83.0],
            "cupper_points" => [8.75, 7.5, 8.58, 7.25, 7.33, 7.67],
            "aroma" => [8.67, 7.5, 8.17, 7.25, 7.42, 7.58],
            "clean_cup" => [10.0, 9.33, 10.0, 10.0, 8.67, 10.0],
            "uniformity" => [10.0, 9.33, 10.0, 9.33, 10.0, 8.67]
        )
        .unwrap()
    }

    #[test]
    fn test_build_report() {
        let report = EdaReport::build(&reviews(), &small_config()).unwrap();

        assert_eq!(report.rows, 6);
        assert_eq!(report.score_histogram.counts.len(), 50);
        assert_eq!(report.score_histogram.total(), 6);
        assert_eq!(report.score_stats.count, 6);
        assert_eq!(report.countries, vec!["Ethiopia", "Guatemala", "Brazil"]);
        assert_eq!(report.by_processing.counts.len(), 2);
        assert_eq!(report.by_country.boxes.len(), 3);
        assert_eq!(report.subset_correlations.len(), 2);
        assert_eq!(report.subset_correlations[0].label, "Washed / Wet");
        assert_eq!(report.densities[1].rows, 3);
    }

    #[test]
    fn test_from_raw_cleans_before_analysing() {
        let raw = df!(
            "Unnamed: 0" => [1i64, 2, 3, 4, 5, 6],
            "Country.of.Origin" => ["Ethiopia", "Guatemala", "Ethiopia", "Brazil", "Guatemala", "Brazil"],
            "Processing.Method" => ["Washed / Wet", "Washed / Wet", "Natural / Dry", "Natural / Dry", "Washed / Wet", "Natural / Dry"],
            "Total.Cup.Points" => [90.58, 82.0, 88.83, 80.5, 81.25, 83.0],
            "Cupper.Points" => [8.75, 7.5, 8.58, 7.25, 7.33, 7.67],
            "Aroma" => [8.67, 7.5, 8.17, 7.25, 7.42, 7.58],
            "Clean.Cup" => [10.0, 9.33, 10.0, 10.0, 8.67, 10.0],
            "Uniformity" => [10.0, 9.33, 10.0, 9.33, 10.0, 8.67]
        )
        .unwrap();

        let (df, report) = EdaReport::from_raw(raw, "reviews.csv", &small_config()).unwrap();
        assert!(df.column("Unnamed: 0").is_err());
        assert_eq!(report.source, "reviews.csv");
        assert!(report.suspect_rows.is_empty());
        assert_eq!(report.columns, DataLoader::get_columns(&df));
        assert_eq!(report.countries, vec!["Ethiopia", "Guatemala", "Brazil"]);
    }

    #[test]
    fn test_missing_column_fails() {
        let config = EdaConfig {
            score_column: "Total.Cup.Points".to_string(),
            ..small_config()
        };
        assert!(EdaReport::build(&reviews(), &config).is_err());
    }
}
