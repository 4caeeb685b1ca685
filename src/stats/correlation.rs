//! Pearson correlation matrices over pairwise-complete observations.

use crate::data::DataLoader;
use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Square correlation matrix with labelled rows and columns.
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    /// Which rows the matrix was computed on, e.g. "All reviews".
    pub label: String,
    pub columns: Vec<String>,
    /// Row-major, `columns.len()` x `columns.len()`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == row)?;
        let j = self.columns.iter().position(|c| c == column)?;
        Some(self.values[i][j])
    }

    /// Frame with a leading `column` name column followed by one column per
    /// variable.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns = vec![Column::new("column".into(), self.columns.clone())];
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<f64> = self.values.iter().map(|row| row[j]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Pearson's r over the positions where both values are present.
///
/// NaN when fewer than two pairs remain or either side has zero variance.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Correlation matrix of `columns` over the rows of `df`.
pub fn correlation_matrix(df: &DataFrame, columns: &[String], label: &str) -> Result<CorrelationMatrix> {
    let data: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| DataLoader::get_f64_values(df, c))
        .collect::<Result<_>>()?;

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        // Degenerate columns keep NaN on the diagonal.
        if !pearson(&data[i], &data[i]).is_nan() {
            values[i][i] = 1.0;
        }
        for j in (i + 1)..n {
            let r = pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    debug!("Computed {}x{} correlation matrix for {}", n, n, label);
    Ok(CorrelationMatrix {
        label: label.to_string(),
        columns: columns.to_vec(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_perfect_correlation() {
        let x = some(&[1.0, 2.0, 3.0, 4.0]);
        let y = some(&[2.0, 4.0, 6.0, 8.0]);
        let z = some(&[8.0, 6.0, 4.0, 2.0]);
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &z) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_complete_observations() {
        let x = vec![Some(1.0), Some(2.0), None, Some(3.0)];
        let y = vec![Some(1.0), Some(2.0), Some(100.0), Some(3.0)];
        assert!((pearson(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(pearson(&some(&[1.0]), &some(&[2.0])).is_nan());
        assert!(pearson(&some(&[5.0, 5.0, 5.0]), &some(&[1.0, 2.0, 3.0])).is_nan());
    }

    #[test]
    fn test_matrix_shape_and_frame() {
        let df = df!(
            "aroma" => [7.5, 8.0, 8.25, 7.0],
            "flavor" => [7.25, 8.0, 8.5, 7.0],
            "sweetness" => [10.0, 10.0, 10.0, 10.0]
        )
        .unwrap();
        let columns = vec!["aroma".to_string(), "flavor".to_string(), "sweetness".to_string()];
        let matrix = correlation_matrix(&df, &columns, "All reviews").unwrap();

        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.get("aroma", "aroma"), Some(1.0));
        assert_eq!(matrix.get("aroma", "flavor"), matrix.get("flavor", "aroma"));
        assert!(matrix.get("sweetness", "sweetness").unwrap().is_nan());
        assert!(matrix.get("aroma", "body").is_none());

        let frame = matrix.to_frame().unwrap();
        assert_eq!(frame.shape(), (3, 4));
    }
}
