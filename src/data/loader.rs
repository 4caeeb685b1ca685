//! CSV Data Loader Module
//! Handles CSV file loading and column extraction using Polars.

use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rows used for dtype inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row.
    ///
    /// Blank header cells are named `Unnamed: {position}` so the row-number
    /// column written by pandas keeps its familiar name.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = file_path.as_ref();
        if !path.is_file() {
            return Err(EdaError::FileNotFound(path.to_path_buf()));
        }

        info!("Loading {}", path.display());
        let mut df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(EdaError::Csv)?;

        let blank = Self::blank_header_positions(path)?;
        Self::name_blank_headers(&mut df, &blank)?;
        debug!("Loaded {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }

    /// Positions of header cells that are empty in the file itself.
    ///
    /// Polars names blank cells `column_{n}`, the same text a real header
    /// may carry, so the header row is re-read as plain strings.
    fn blank_header_positions(path: &Path) -> Result<Vec<usize>> {
        let header = LazyCsvReader::new(path)
            .with_has_header(false)
            .with_infer_schema_length(Some(0))
            .with_n_rows(Some(1))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(EdaError::Csv)?;

        Ok(header
            .get_columns()
            .iter()
            .enumerate()
            .filter(|(_, col)| {
                col.as_materialized_series()
                    .str()
                    .map(|cells| cells.get(0).map_or(true, |cell| cell.trim().is_empty()))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect())
    }

    fn name_blank_headers(df: &mut DataFrame, positions: &[usize]) -> Result<()> {
        let columns = Self::get_columns(df);
        for &i in positions {
            let Some(old) = columns.get(i) else {
                continue;
            };
            let new = format!("Unnamed: {i}");
            debug!("Naming blank header '{}' as '{}'", old, new);
            df.rename(old, new.into())?;
        }
        Ok(())
    }

    /// Get list of column names.
    pub fn get_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Whether a dtype counts as numeric for summaries.
    pub fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| Self::is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Column names paired with their dtypes.
    pub fn get_schema(df: &DataFrame) -> Vec<(String, String)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.dtype().to_string()))
            .collect()
    }

    /// Get unique non-null values from a column, in order of first appearance.
    pub fn get_unique_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
        let mut unique: Vec<String> = Vec::new();
        for value in Self::get_string_values(df, column)?.into_iter().flatten() {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        Ok(unique)
    }

    /// Values of a column as strings, nulls preserved.
    pub fn get_string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
        let col = Self::column(df, column)?;
        let as_str = col.cast(&DataType::String)?;
        Ok(as_str
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect())
    }

    /// Values of a column as f64, nulls and NaN mapped to `None`.
    pub fn get_f64_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
        let col = Self::column(df, column)?;
        let as_f64 = col.cast(&DataType::Float64)?;
        Ok(as_f64
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Non-missing values of a numeric column.
    pub fn get_present_f64_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
        Ok(Self::get_f64_values(df, column)?.into_iter().flatten().collect())
    }

    /// Look up a column, mapping absence to [`EdaError::ColumnNotFound`].
    pub fn column<'a>(df: &'a DataFrame, column: &str) -> Result<&'a Column> {
        df.column(column)
            .map_err(|_| EdaError::ColumnNotFound(column.to_string()))
    }

    /// Rows whose value in `column` equals `value`.
    pub fn filter_equals(df: &DataFrame, column: &str, value: &str) -> Result<DataFrame> {
        Self::column(df, column)?;
        let filtered = df
            .clone()
            .lazy()
            .filter(col(column).eq(lit(value)))
            .collect()?;
        Ok(filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::load_csv("no/such/arabica.csv").unwrap_err();
        assert!(matches!(err, EdaError::FileNotFound(_)));
    }

    #[test]
    fn test_load_infers_numeric_columns() {
        let file = write_csv("Unnamed: 0,Country.of.Origin,Aroma\n1,Ethiopia,8.67\n2,Ethiopia,8.75\n");
        let df = DataLoader::load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(
            DataLoader::get_numeric_columns(&df),
            vec!["Unnamed: 0".to_string(), "Aroma".to_string()]
        );
    }

    #[test]
    fn test_blank_header_named_like_pandas() {
        let file = write_csv(",Species,Aroma\n1,Arabica,8.6\n2,Arabica,8.4\n");
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(DataLoader::get_columns(&df)[0], "Unnamed: 0");
    }

    #[test]
    fn test_placeholder_like_header_is_kept() {
        let file = write_csv("id,column_2,Aroma\n1,a,8.6\n2,b,8.4\n");
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(
            DataLoader::get_columns(&df),
            vec!["id".to_string(), "column_2".to_string(), "Aroma".to_string()]
        );
    }

    #[test]
    fn test_blank_header_in_the_middle() {
        let file = write_csv("Species,,Aroma\nArabica,1,8.6\nArabica,2,8.4\n");
        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(DataLoader::get_columns(&df)[1], "Unnamed: 1");
    }

    #[test]
    fn test_unique_values_in_appearance_order() {
        let df = df!(
            "processing_method" => [Some("Washed / Wet"), None, Some("Natural / Dry"), Some("Washed / Wet")]
        )
        .unwrap();
        assert_eq!(
            DataLoader::get_unique_values(&df, "processing_method").unwrap(),
            vec!["Washed / Wet".to_string(), "Natural / Dry".to_string()]
        );
    }

    #[test]
    fn test_unknown_column() {
        let df = df!("aroma" => [8.0, 7.5]).unwrap();
        let err = DataLoader::get_f64_values(&df, "flavor").unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(ref c) if c == "flavor"));
    }

    #[test]
    fn test_filter_equals() {
        let df = df!(
            "processing_method" => ["Washed / Wet", "Natural / Dry", "Washed / Wet"],
            "aroma" => [8.0, 7.0, 7.5]
        )
        .unwrap();
        let washed = DataLoader::filter_equals(&df, "processing_method", "Washed / Wet").unwrap();
        assert_eq!(
            DataLoader::get_present_f64_values(&washed, "aroma").unwrap(),
            vec![8.0, 7.5]
        );
    }
}
