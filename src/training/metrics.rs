//! Regression metrics and the persisted metrics record

use crate::error::{TriageError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root-mean-squared error
///
/// # Panics
///
/// If `y_true` and `y_pred` differ in length.
pub fn rmse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    assert_eq!(y_true.len(), y_pred.len(), "rmse: y_true and y_pred lengths differ");
    if y_true.is_empty() {
        return 0.0;
    }
    let mse = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / y_true.len() as f64;
    mse.sqrt()
}

/// Held-out regression metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

impl RegressionMetrics {
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(TriageError::Shape {
                expected: format!("{} predictions", y_true.len()),
                actual: format!("{} predictions", y_pred.len()),
            });
        }
        let n = y_true.len().max(1) as f64;

        let mae = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| (t - p).abs())
            .sum::<f64>()
            / n;

        let y_mean = y_true.iter().sum::<f64>() / n;
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| (t - p).powi(2))
            .sum();
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

        Ok(Self {
            rmse: rmse(y_true, y_pred),
            mae,
            r2,
        })
    }
}

/// Metrics summary written next to the model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub version: String,
    pub rmse: f64,
    pub seed: u64,
    pub n_train: usize,
    pub n_test: usize,
    pub test_size: f64,
    pub mae: f64,
    pub r2: f64,
}

impl MetricsReport {
    /// Write as pretty JSON, creating parent directories; overwrites silently
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rmse() {
        let y_true = array![1.0, 2.0, 3.0, 4.0];
        let y_pred = array![1.0, 2.0, 3.0, 6.0];
        assert!((rmse(&y_true, &y_pred) - 1.0).abs() < 1e-12);
        assert_eq!(rmse(&y_true, &y_true), 0.0);
    }

    #[test]
    fn test_regression_metrics() {
        let y_true = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y_pred = array![1.1, 2.0, 2.9, 4.1, 5.0];

        let metrics = RegressionMetrics::compute(&y_true, &y_pred).unwrap();
        assert!(metrics.rmse > 0.0);
        assert!((metrics.mae - 0.06).abs() < 1e-12);
        assert!(metrics.r2 > 0.9);
    }

    #[test]
    fn test_length_mismatch_is_shape_error() {
        let y_true = array![1.0, 2.0, 3.0];
        let y_pred = array![1.0, 2.0];
        assert!(matches!(
            RegressionMetrics::compute(&y_true, &y_pred),
            Err(TriageError::Shape { .. })
        ));
    }

    #[test]
    #[should_panic(expected = "lengths differ")]
    fn test_rmse_length_mismatch_panics() {
        rmse(&array![1.0, 2.0, 3.0], &array![1.0]);
    }

    #[test]
    fn test_report_json_keys() {
        let report = MetricsReport {
            version: "v0.1".to_string(),
            rmse: 53.8,
            seed: 42,
            n_train: 353,
            n_test: 89,
            test_size: 0.2,
            mae: 42.8,
            r2: 0.45,
        };
        let value = serde_json::to_value(&report).unwrap();
        for key in ["version", "rmse", "seed", "n_train", "n_test"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
    }
}
