//! Error types for the coffee review analysis.
//!
//! Every failure in the pipeline is fatal: the driver aborts on the first
//! error, so variants carry enough context to explain what went wrong.

use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for loading, cleaning and analysing the dataset.
#[derive(Error, Debug)]
pub enum EdaError {
    /// Input CSV does not exist.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// CSV could not be read or parsed.
    #[error("Failed to load CSV: {0}")]
    Csv(#[source] PolarsError),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Renaming produced a column name that already exists.
    #[error("Column name '{0}' appears more than once after normalization")]
    DuplicateColumn(String),

    /// A patch targets a row the table does not have.
    #[error("Row {row} is out of range for a table with {height} rows")]
    RowOutOfRange { row: usize, height: usize },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Chart export failed.
    #[error("Failed to render chart: {0}")]
    Render(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// JSON configuration error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EdaError {
    /// Stable identifier for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileNotFound(_) => "FILE_NOT_FOUND",
            Self::Csv(_) => "CSV_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Render(_) => "RENDER_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, EdaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            EdaError::FileNotFound(PathBuf::from("missing.csv")).error_code(),
            "FILE_NOT_FOUND"
        );
        assert_eq!(
            EdaError::RowOutOfRange { row: 543, height: 5 }.error_code(),
            "ROW_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_messages_name_the_culprit() {
        let err = EdaError::ColumnNotFound("altitude_mean_meters".to_string());
        assert!(err.to_string().contains("altitude_mean_meters"));

        let err = EdaError::RowOutOfRange { row: 1144, height: 10 };
        assert!(err.to_string().contains("1144"));
        assert!(err.to_string().contains("10"));
    }
}
