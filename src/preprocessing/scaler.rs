//! Feature scaling

use crate::error::{TriageError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Standard scaling (z-score normalization): (x - mean) / std
///
/// Uses the population standard deviation (ddof = 0). Columns with zero
/// variance keep a scale of 1.0 so they pass through centered but unscaled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Create a new unfitted scaler
    pub fn new() -> Self {
        Self { mean: None, scale: None }
    }

    /// Learn per-column mean and std
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<&mut Self> {
        if x.nrows() == 0 {
            return Err(TriageError::Training(
                "Cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| TriageError::Training("Failed to compute column means".to_string()))?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(self)
    }

    /// Apply the learned scaling
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (mean, scale) = match (&self.mean, &self.scale) {
            (Some(m), Some(s)) => (m, s),
            _ => return Err(TriageError::ModelNotFitted),
        };

        if x.ncols() != mean.len() {
            return Err(TriageError::Shape {
                expected: format!("{} columns", mean.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        Ok((x - &mean.view().insert_axis(Axis(0))) / &scale.view().insert_axis(Axis(0)))
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standard_scaler() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0], [5.0, 50.0]];

        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        for col in scaled.axis_iter(Axis(1)) {
            let mean = col.mean().unwrap();
            let std = col.std(0.0);
            assert!(mean.abs() < 1e-10);
            assert!((std - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_constant_column() {
        let x = array![[1.0, 7.0], [2.0, 7.0], [3.0, 7.0]];

        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).unwrap();

        assert!(scaled.column(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_transform_before_fit() {
        let scaler = StandardScaler::new();
        let result = scaler.transform(&array![[1.0]]);
        assert!(matches!(result, Err(TriageError::ModelNotFitted)));
    }

    #[test]
    fn test_column_mismatch() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let result = scaler.transform(&array![[1.0, 2.0, 3.0]]);
        assert!(matches!(result, Err(TriageError::Shape { .. })));
    }
}
