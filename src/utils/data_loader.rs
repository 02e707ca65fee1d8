//! Dataset loading

use crate::error::{TriageError, Result};
use crate::features::{FEATURE_NAMES, TARGET_COLUMN};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

/// Diabetes dataset (442 patients, 10 standardized features, disease progression target)
const BUNDLED_DIABETES_CSV: &str = include_str!("../../data/diabetes.csv");

/// Feature matrix and labels in [`FEATURE_NAMES`] column order
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub feature_names: Vec<String>,
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }
}

/// Loads training data from CSV into the fixed feature layout
#[derive(Debug, Clone, Default)]
pub struct DataLoader;

impl DataLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse the diabetes dataset compiled into the binary
    pub fn load_bundled(&self) -> Result<Dataset> {
        let start = Instant::now();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .into_reader_with_file_handle(Cursor::new(BUNDLED_DIABETES_CSV.as_bytes()))
            .finish()?;
        let dataset = Self::to_dataset(&df)?;
        tracing::debug!(
            rows = dataset.n_samples(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded bundled diabetes dataset"
        );
        Ok(dataset)
    }

    /// Load a CSV file with the feature columns and a `target` column
    pub fn load_csv(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path).map_err(|e| {
            TriageError::Data(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .into_reader_with_file_handle(file)
            .finish()?;

        let dataset = Self::to_dataset(&df)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.n_samples(),
            "Loaded training data"
        );
        Ok(dataset)
    }

    /// Select the feature columns in training order plus the target
    pub fn to_dataset(df: &DataFrame) -> Result<Dataset> {
        if df.height() == 0 {
            return Err(TriageError::Data("Dataset has no rows".to_string()));
        }

        let names: Vec<String> = FEATURE_NAMES.iter().map(|s| s.to_string()).collect();
        let x = Self::columns_to_array2(df, &names)?;
        let y = Array1::from_vec(Self::column_values(df, TARGET_COLUMN)?);

        Ok(Dataset {
            x,
            y,
            feature_names: names,
        })
    }

    fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
        let column = df
            .column(name)
            .map_err(|_| TriageError::Data(format!("Missing column: {}", name)))?;
        let column = column
            .cast(&DataType::Float64)
            .map_err(|e| TriageError::Data(format!("Column {} is not numeric: {}", name, e)))?;
        let values = column
            .f64()
            .map_err(|e| TriageError::Data(e.to_string()))?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.filter(|v| v.is_finite()).ok_or_else(|| {
                    TriageError::Data(format!("Missing or non-numeric value in {} at row {}", name, row))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(values)
    }

    /// Extract named columns into a row-major matrix
    fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
        let col_data: Vec<Vec<f64>> = col_names
            .iter()
            .map(|name| Self::column_values(df, name))
            .collect::<Result<_>>()?;

        Ok(Array2::from_shape_fn((df.height(), col_names.len()), |(r, c)| col_data[c][r]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_dataset_shape() {
        let dataset = DataLoader::new().load_bundled().unwrap();
        assert_eq!(dataset.n_samples(), 442);
        assert_eq!(dataset.n_features(), 10);
        assert_eq!(dataset.feature_names, FEATURE_NAMES.to_vec());
        assert_eq!(dataset.y[0], 151.0);
        assert!((dataset.x[[0, 0]] - 0.0380759).abs() < 1e-6);
    }

    #[test]
    fn test_csv_columns_reordered() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // columns deliberately out of training order
        writeln!(file, "target,s6,s5,s4,s3,s2,s1,bp,bmi,sex,age").unwrap();
        writeln!(file, "100,10,9,8,7,6,5,4,3,2,1").unwrap();
        writeln!(file, "200,20,19,18,17,16,15,14,13,12,11").unwrap();

        let dataset = DataLoader::new().load_csv(file.path()).unwrap();
        assert_eq!(dataset.x.row(0).to_vec(), (1..=10).map(|v| v as f64).collect::<Vec<_>>());
        assert_eq!(dataset.y.to_vec(), vec![100.0, 200.0]);
    }

    #[test]
    fn test_missing_column() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "age,sex,target").unwrap();
        writeln!(file, "1,2,3").unwrap();

        let err = DataLoader::new().load_csv(file.path()).unwrap_err();
        assert!(err.to_string().contains("Missing column"));
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::new()
            .load_csv(Path::new("/nonexistent/diabetes.csv"))
            .unwrap_err();
        assert!(matches!(err, TriageError::Data(_)));
    }
}
