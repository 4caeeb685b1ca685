//! Data Cleaner Module
//! Drops the row-number column, normalizes column names and applies the
//! altitude correction table.

use crate::config::{AltitudePatch, EdaConfig};
use crate::data::DataLoader;
use crate::error::{EdaError, Result};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Handles the one-off cleaning of the review table.
pub struct DataCleaner;

impl DataCleaner {
    /// Run every cleaning step in order and return the cleaned table.
    pub fn clean(df: DataFrame, config: &EdaConfig) -> Result<DataFrame> {
        Self::clean_with_inspection(df, config).map(|(df, _)| df)
    }

    /// Like [`Self::clean`], also returning the rows whose first altitude
    /// column exceeded the outlier threshold before patching.
    pub fn clean_with_inspection(df: DataFrame, config: &EdaConfig) -> Result<(DataFrame, Vec<usize>)> {
        let df = Self::drop_index_column(df, &config.index_column)?;
        let df = Self::normalize_column_names(df)?;

        let suspect_rows = match config.altitude_columns.first() {
            Some(column) if df.column(column).is_ok() => {
                Self::altitude_outliers(&df, column, config.altitude_outlier_threshold)?
            }
            _ => Vec::new(),
        };
        if !suspect_rows.is_empty() {
            warn!(
                "{} rows exceed {} m before patching: {:?}",
                suspect_rows.len(),
                config.altitude_outlier_threshold,
                suspect_rows
            );
        }

        let df = Self::apply_altitude_patches(df, &config.altitude_columns, &config.altitude_patches)?;
        info!("Cleaned table: {} rows x {} columns", df.height(), df.width());
        Ok((df, suspect_rows))
    }

    /// Drop the auto-generated row-number column.
    pub fn drop_index_column(df: DataFrame, index_column: &str) -> Result<DataFrame> {
        DataLoader::column(&df, index_column)?;
        debug!("Dropping index column '{}'", index_column);
        Ok(df.drop(index_column)?)
    }

    /// `Country.of.Origin` becomes `country_of_origin`.
    pub fn normalize_name(name: &str) -> String {
        name.replace('.', "_").to_lowercase()
    }

    /// Rename every column with [`Self::normalize_name`].
    pub fn normalize_column_names(mut df: DataFrame) -> Result<DataFrame> {
        let columns = DataLoader::get_columns(&df);
        let mut normalized: Vec<String> = Vec::with_capacity(columns.len());
        for name in &columns {
            let new_name = Self::normalize_name(name);
            if normalized.contains(&new_name) {
                return Err(EdaError::DuplicateColumn(new_name));
            }
            normalized.push(new_name);
        }

        // Targets are unique and already normalized, so renaming one at a
        // time never collides with a column still waiting to be renamed.
        for (old, new) in columns.iter().zip(normalized) {
            if *old != new {
                df.rename(old, new.into())?;
            }
        }
        Ok(df)
    }

    /// Overwrite every altitude column of each patched row with the patch value.
    ///
    /// Tables without any altitude column are returned unchanged. Altitude
    /// columns come back as `Float64`.
    pub fn apply_altitude_patches(
        mut df: DataFrame,
        altitude_columns: &[String],
        patches: &[AltitudePatch],
    ) -> Result<DataFrame> {
        let present: Vec<&String> = altitude_columns
            .iter()
            .filter(|name| df.column(name).is_ok())
            .collect();
        if present.is_empty() {
            warn!("No altitude columns present, skipping altitude patches");
            return Ok(df);
        }
        if let Some(missing) = altitude_columns.iter().find(|name| !present.contains(name)) {
            return Err(EdaError::ColumnNotFound(missing.clone()));
        }

        let height = df.height();
        if let Some(patch) = patches.iter().find(|p| p.row >= height) {
            return Err(EdaError::RowOutOfRange {
                row: patch.row,
                height,
            });
        }

        for name in altitude_columns {
            let mut values = DataLoader::get_f64_values(&df, name)?;
            for patch in patches {
                debug!(
                    "Patching {}[{}]: {:?} -> {}",
                    name, patch.row, values[patch.row], patch.value
                );
                values[patch.row] = Some(patch.value);
            }
            df.replace(name, Series::new(name.as_str().into(), values))?;
        }

        info!("Applied {} altitude patches", patches.len());
        Ok(df)
    }

    /// Row positions whose value in `column` exceeds `threshold`.
    pub fn altitude_outliers(df: &DataFrame, column: &str, threshold: f64) -> Result<Vec<usize>> {
        Ok(DataLoader::get_f64_values(df, column)?
            .into_iter()
            .enumerate()
            .filter_map(|(i, v)| v.filter(|&x| x > threshold).map(|_| i))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn altitudes() -> Vec<String> {
        vec![
            "altitude_low_meters".to_string(),
            "altitude_mean_meters".to_string(),
            "altitude_high_meters".to_string(),
        ]
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(DataCleaner::normalize_name("Country.of.Origin"), "country_of_origin");
        assert_eq!(DataCleaner::normalize_name("Number.of.Bags"), "number_of_bags");
        assert_eq!(DataCleaner::normalize_name("Cupper.Points"), "cupper_points");
        assert_eq!(DataCleaner::normalize_name("aroma"), "aroma");
    }

    #[test]
    fn test_duplicate_after_normalization() {
        let df = df!("Aroma" => [1.0], "aroma" => [2.0]).unwrap();
        let err = DataCleaner::normalize_column_names(df).unwrap_err();
        assert!(matches!(err, EdaError::DuplicateColumn(ref c) if c == "aroma"));
    }

    #[test]
    fn test_drop_missing_index_column() {
        let df = df!("Aroma" => [1.0]).unwrap();
        let err = DataCleaner::drop_index_column(df, "Unnamed: 0").unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(_)));
    }

    #[test]
    fn test_patches_touch_only_listed_rows() {
        let df = df!(
            "altitude_low_meters" => [1200.0, 190164.0, 1500.0],
            "altitude_mean_meters" => [1250.0, 190164.0, 1550.0],
            "altitude_high_meters" => [1300, 190164, 1600]
        )
        .unwrap();
        let patches = [AltitudePatch::new(1, 1100.0)];

        let df = DataCleaner::apply_altitude_patches(df, &altitudes(), &patches).unwrap();

        for name in altitudes() {
            let values = DataLoader::get_f64_values(&df, &name).unwrap();
            assert_eq!(values[1], Some(1100.0), "{name}");
        }
        assert_eq!(
            DataLoader::get_f64_values(&df, "altitude_high_meters").unwrap(),
            vec![Some(1300.0), Some(1100.0), Some(1600.0)]
        );
        assert_eq!(
            DataLoader::get_f64_values(&df, "altitude_low_meters").unwrap()[0],
            Some(1200.0)
        );
    }

    #[test]
    fn test_patch_keeps_nulls_elsewhere() {
        let df = df!(
            "altitude_low_meters" => [None, Some(190164.0)],
            "altitude_mean_meters" => [None, Some(190164.0)],
            "altitude_high_meters" => [None, Some(190164.0)]
        )
        .unwrap();
        let df = DataCleaner::apply_altitude_patches(df, &altitudes(), &[AltitudePatch::new(1, 1902.0)])
            .unwrap();
        assert_eq!(
            DataLoader::get_f64_values(&df, "altitude_mean_meters").unwrap(),
            vec![None, Some(1902.0)]
        );
    }

    #[test]
    fn test_patch_row_out_of_range() {
        let df = df!(
            "altitude_low_meters" => [1.0],
            "altitude_mean_meters" => [1.0],
            "altitude_high_meters" => [1.0]
        )
        .unwrap();
        let err = DataCleaner::apply_altitude_patches(df, &altitudes(), &[AltitudePatch::new(543, 1100.0)])
            .unwrap_err();
        assert!(matches!(err, EdaError::RowOutOfRange { row: 543, height: 1 }));
    }

    #[test]
    fn test_partial_altitude_columns_fail() {
        let df = df!("altitude_low_meters" => [1.0]).unwrap();
        let err = DataCleaner::apply_altitude_patches(df, &altitudes(), &[]).unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(ref c) if c == "altitude_mean_meters"));
    }

    #[test]
    fn test_no_altitude_columns_skips_patches() {
        let df = df!("aroma" => [8.0, 7.0]).unwrap();
        let df = DataCleaner::apply_altitude_patches(
            df,
            &altitudes(),
            &[AltitudePatch::new(543, 1100.0)],
        )
        .unwrap();
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn test_altitude_outliers() {
        let df = df!("altitude_low_meters" => [Some(1200.0), Some(190164.0), None, Some(11000.0)]).unwrap();
        assert_eq!(
            DataCleaner::altitude_outliers(&df, "altitude_low_meters", 5000.0).unwrap(),
            vec![1, 3]
        );
    }
}
