//! Configuration for the coffee review analysis.
//!
//! The defaults describe the CQI arabica dataset: which column is the
//! row-number column, which rows carry bad altitudes, and which columns
//! each chart looks at. A JSON file can override any subset of fields.

use crate::error::{EdaError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One entry of the altitude correction table.
///
/// `row` is the 0-based position in the cleaned table; `value` is written to
/// every altitude column of that row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AltitudePatch {
    pub row: usize,
    pub value: f64,
}

impl AltitudePatch {
    pub const fn new(row: usize, value: f64) -> Self {
        Self { row, value }
    }
}

/// Known-bad altitude rows and their corrections.
///
/// The values come from external geographic references for the lots'
/// growing regions and are used as given.
pub const DEFAULT_ALTITUDE_PATCHES: [AltitudePatch; 4] = [
    AltitudePatch::new(543, 1100.0),
    AltitudePatch::new(896, 1902.0),
    AltitudePatch::new(1040, 1100.0),
    AltitudePatch::new(1144, 1902.0),
];

/// Sensory attributes scored by the cuppers.
pub const SENSORY_COLUMNS: [&str; 10] = [
    "aroma",
    "flavor",
    "aftertaste",
    "acidity",
    "body",
    "balance",
    "uniformity",
    "clean_cup",
    "sweetness",
    "moisture",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    /// Auto-generated row-number column dropped by the cleaner.
    pub index_column: String,

    /// Altitude columns patched together: low, mean, high.
    pub altitude_columns: Vec<String>,

    /// Correction table applied after renaming.
    pub altitude_patches: Vec<AltitudePatch>,

    /// Rows whose first altitude column exceeds this are reported as suspect.
    pub altitude_outlier_threshold: f64,

    /// Aggregate score column.
    pub score_column: String,

    /// Bins for the aggregate score histogram.
    pub score_bins: usize,

    /// Columns drawn in the histogram grid.
    pub histogram_columns: Vec<String>,

    /// Bins for each histogram in the grid.
    pub histogram_bins: usize,

    /// Columns of the overall correlation matrix.
    pub correlation_columns: Vec<String>,

    /// Columns of the per-processing-method correlation matrices.
    pub subset_correlation_columns: Vec<String>,

    /// Origin column used for counts and box plots.
    pub country_column: String,

    /// Processing method column used for counts, box plots and subsets.
    pub processing_column: String,

    /// Score compared across groups in the box plots.
    pub box_value_column: String,

    /// Processing methods analysed as separate subsets.
    pub subsets: Vec<String>,

    /// Columns whose densities are overlaid per subset.
    pub density_columns: Vec<String>,

    /// Number of evaluation points for each density curve.
    pub density_grid_size: usize,
}

impl Default for EdaConfig {
    fn default() -> Self {
        let mut histogram_columns = strings(&SENSORY_COLUMNS);
        histogram_columns.extend(strings(&["altitude_low_meters", "altitude_high_meters"]));

        Self {
            index_column: "Unnamed: 0".to_string(),
            altitude_columns: strings(&[
                "altitude_low_meters",
                "altitude_mean_meters",
                "altitude_high_meters",
            ]),
            altitude_patches: DEFAULT_ALTITUDE_PATCHES.to_vec(),
            altitude_outlier_threshold: 5000.0,
            score_column: "total_cup_points".to_string(),
            score_bins: 50,
            histogram_columns,
            histogram_bins: 40,
            correlation_columns: strings(&SENSORY_COLUMNS),
            subset_correlation_columns: strings(&SENSORY_COLUMNS[..9]),
            country_column: "country_of_origin".to_string(),
            processing_column: "processing_method".to_string(),
            box_value_column: "cupper_points".to_string(),
            subsets: strings(&["Washed / Wet", "Natural / Dry"]),
            density_columns: strings(&["clean_cup", "uniformity"]),
            density_grid_size: 200,
        }
    }
}

impl EdaConfig {
    /// Load overrides from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EdaError::FileNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every chart has something to draw.
    pub fn validate(&self) -> Result<()> {
        if self.score_bins == 0 || self.histogram_bins == 0 {
            return Err(EdaError::InvalidConfig(
                "histogram bin counts must be positive".to_string(),
            ));
        }
        if self.density_grid_size < 2 {
            return Err(EdaError::InvalidConfig(format!(
                "density_grid_size must be at least 2, got {}",
                self.density_grid_size
            )));
        }

        let required = [
            ("altitude_columns", &self.altitude_columns),
            ("histogram_columns", &self.histogram_columns),
            ("correlation_columns", &self.correlation_columns),
            ("subset_correlation_columns", &self.subset_correlation_columns),
            ("density_columns", &self.density_columns),
        ];
        for (name, columns) in required {
            if columns.is_empty() {
                return Err(EdaError::InvalidConfig(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_matches_dataset() {
        let config = EdaConfig::default();
        assert_eq!(config.index_column, "Unnamed: 0");
        assert_eq!(config.histogram_columns.len(), 12);
        assert_eq!(config.correlation_columns.len(), 10);
        assert_eq!(config.subset_correlation_columns.len(), 9);
        assert!(!config.subset_correlation_columns.contains(&"moisture".to_string()));
        assert_eq!(
            config
                .altitude_patches
                .iter()
                .map(|p| (p.row, p.value))
                .collect::<Vec<_>>(),
            vec![(543, 1100.0), (896, 1902.0), (1040, 1100.0), (1144, 1902.0)]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"score_bins": 20, "subsets": ["Washed / Wet"]}}"#).unwrap();

        let config = EdaConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.score_bins, 20);
        assert_eq!(config.subsets, vec!["Washed / Wet".to_string()]);
        assert_eq!(config.histogram_bins, 40);
        assert_eq!(config.altitude_patches.len(), 4);
    }

    #[test]
    fn test_validate_rejects_zero_bins() {
        let config = EdaConfig {
            histogram_bins: 0,
            ..EdaConfig::default()
        };
        assert!(matches!(config.validate(), Err(EdaError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let err = EdaConfig::from_json_file("does/not/exist.json").unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }
}
