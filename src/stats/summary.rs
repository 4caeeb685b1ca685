//! Table-level summaries: null counts and per-column mean/min/max.

use crate::data::DataLoader;
use crate::error::Result;
use polars::prelude::*;

/// Mean, min and max of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub null_count: usize,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Null counts for every column plus numeric reductions.
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub rows: usize,
    /// All columns, in table order.
    pub null_counts: Vec<(String, usize)>,
    /// Numeric columns only, in table order.
    pub numeric: Vec<NumericSummary>,
}

impl DatasetSummary {
    /// Summarize a cleaned table.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let null_counts = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect();

        let numeric = DataLoader::get_numeric_columns(df)
            .into_iter()
            .map(|name| Self::summarize_numeric(df, name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rows: df.height(),
            null_counts,
            numeric,
        })
    }

    fn summarize_numeric(df: &DataFrame, name: String) -> Result<NumericSummary> {
        let values = DataLoader::get_present_f64_values(df, &name)?;
        let null_count = DataLoader::column(df, &name)?.null_count();
        let mean = (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64);
        let min = values.iter().copied().reduce(f64::min);
        let max = values.iter().copied().reduce(f64::max);

        Ok(NumericSummary {
            column: name,
            null_count,
            mean,
            min,
            max,
        })
    }

    /// Names of the summarized numeric columns.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.numeric.iter().map(|s| s.column.as_str()).collect()
    }

    /// Columns with at least one missing value.
    pub fn columns_with_nulls(&self) -> Vec<(&str, usize)> {
        self.null_counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(c, n)| (c.as_str(), *n))
            .collect()
    }

    /// Two-column frame of null counts per column.
    pub fn null_counts_frame(&self) -> Result<DataFrame> {
        let names: Vec<&str> = self.null_counts.iter().map(|(c, _)| c.as_str()).collect();
        let counts: Vec<u64> = self.null_counts.iter().map(|(_, n)| *n as u64).collect();
        Ok(DataFrame::new(vec![
            Column::new("column".into(), names),
            Column::new("null_count".into(), counts),
        ])?)
    }

    /// One row per statistic (`null_count`, `mean`, `min`, `max`), one
    /// column per numeric column.
    pub fn numeric_frame(&self) -> Result<DataFrame> {
        let mut columns = vec![Column::new(
            "statistic".into(),
            vec!["null_count", "mean", "min", "max"],
        )];
        for s in &self.numeric {
            columns.push(Column::new(
                s.column.as_str().into(),
                vec![Some(s.null_count as f64), s.mean, s.min, s.max],
            ));
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reviews() -> DataFrame {
        df!(
            "country_of_origin" => [Some("Ethiopia"), Some("Guatemala"), None],
            "aroma" => [Some(8.67), None, Some(8.17)],
            "number_of_bags" => [300, 5, 320]
        )
        .unwrap()
    }

    #[test]
    fn test_numeric_summary_matches_projection() {
        let df = reviews();
        let summary = DatasetSummary::from_dataframe(&df).unwrap();
        assert_eq!(
            summary.numeric_columns(),
            DataLoader::get_numeric_columns(&df)
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_reductions_skip_nulls() {
        let summary = DatasetSummary::from_dataframe(&reviews()).unwrap();
        let aroma = &summary.numeric[0];
        assert_eq!(aroma.null_count, 1);
        assert_eq!(aroma.min, Some(8.17));
        assert_eq!(aroma.max, Some(8.67));
        assert!((aroma.mean.unwrap() - 8.42).abs() < 1e-9);

        let bags = &summary.numeric[1];
        assert_eq!(bags.max, Some(320.0));
    }

    #[test]
    fn test_null_counts_cover_all_columns() {
        let summary = DatasetSummary::from_dataframe(&reviews()).unwrap();
        assert_eq!(summary.null_counts.len(), 3);
        assert_eq!(
            summary.columns_with_nulls(),
            vec![("country_of_origin", 1), ("aroma", 1)]
        );
        assert_eq!(summary.null_counts_frame().unwrap().height(), 3);
        assert_eq!(summary.numeric_frame().unwrap().shape(), (4, 3));
    }

    #[test]
    fn test_all_null_column() {
        let df = df!("moisture" => [None::<f64>, None]).unwrap();
        let summary = DatasetSummary::from_dataframe(&df).unwrap();
        assert_eq!(summary.numeric[0].mean, None);
        assert_eq!(summary.numeric[0].null_count, 2);
    }
}
