//! Scaler + regressor pipeline fitted and serialized as one unit

use crate::error::{TriageError, Result};
use crate::features::Predictor;
use crate::preprocessing::StandardScaler;
use super::config::ModelVersion;
use super::linear_models::{LinearRegression, RidgeRegression};
use super::random_forest::RandomForestRegressor;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Trees in the v0.2 forest
pub const FOREST_ESTIMATORS: usize = 200;

/// Ridge penalty for v0.3
pub const RIDGE_ALPHA: f64 = 1.0;

/// Fitted estimator variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Regressor {
    Linear(LinearRegression),
    RandomForest(RandomForestRegressor),
    Ridge(RidgeRegression),
}

impl Regressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            Regressor::Linear(m) => m.fit(x, y).map(|_| ()),
            Regressor::RandomForest(m) => m.fit(x, y).map(|_| ()),
            Regressor::Ridge(m) => m.fit(x, y).map(|_| ()),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            Regressor::Linear(m) => m.predict(x),
            Regressor::RandomForest(m) => m.predict(x),
            Regressor::Ridge(m) => m.predict(x),
        }
    }
}

/// StandardScaler followed by the version's regressor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipeline {
    version: ModelVersion,
    scaler: StandardScaler,
    regressor: Regressor,
    is_fitted: bool,
}

impl Pipeline {
    /// Build the unfitted pipeline for `version`; `seed` feeds stochastic estimators
    pub fn new(version: ModelVersion, seed: u64) -> Self {
        let regressor = match version {
            ModelVersion::V0_1 => Regressor::Linear(LinearRegression::new()),
            ModelVersion::V0_2 => Regressor::RandomForest(
                RandomForestRegressor::new(FOREST_ESTIMATORS).with_random_state(seed),
            ),
            ModelVersion::V0_3 => Regressor::Ridge(RidgeRegression::new(RIDGE_ALPHA)),
        };
        Self {
            version,
            scaler: StandardScaler::new(),
            regressor,
            is_fitted: false,
        }
    }

    /// Fit the scaler, then the regressor on the scaled features
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let x_scaled = self.scaler.fit_transform(x)?;
        self.regressor.fit(&x_scaled, y)?;
        self.is_fitted = true;
        Ok(self)
    }

    /// Scale, then predict
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(TriageError::ModelNotFitted);
        }
        let x_scaled = self.scaler.transform(x)?;
        let predictions = self.regressor.predict(&x_scaled)?;

        if let Some(bad) = predictions.iter().position(|p| !p.is_finite()) {
            return Err(TriageError::Prediction(format!(
                "non-finite prediction for row {}",
                bad
            )));
        }
        Ok(predictions)
    }

    pub fn version(&self) -> ModelVersion {
        self.version
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

impl Predictor for Pipeline {
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Pipeline::predict(self, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn data() -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((30, 3), |(i, j)| ((i + 1) * (j + 2)) as f64 % 7.0 + i as f64 * 0.1);
        let y = x.column(0).mapv(|v| 2.0 * v) + x.column(2).mapv(|v| v * 0.5) + 3.0;
        (x, y)
    }

    #[test]
    fn test_version_selects_regressor() {
        assert!(matches!(Pipeline::new(ModelVersion::V0_1, 0).regressor, Regressor::Linear(_)));
        assert!(matches!(Pipeline::new(ModelVersion::V0_2, 0).regressor, Regressor::RandomForest(_)));
        assert!(matches!(Pipeline::new(ModelVersion::V0_3, 0).regressor, Regressor::Ridge(_)));
    }

    #[test]
    fn test_linear_pipeline_fits_linear_target() {
        let (x, y) = data();
        let mut pipeline = Pipeline::new(ModelVersion::V0_1, 42);
        pipeline.fit(&x, &y).unwrap();

        let preds = pipeline.predict(&x).unwrap();
        for (p, t) in preds.iter().zip(y.iter()) {
            assert!((p - t).abs() < 1e-6);
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let pipeline = Pipeline::new(ModelVersion::V0_3, 0);
        assert!(matches!(
            pipeline.predict(&array![[1.0, 2.0, 3.0]]),
            Err(TriageError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_wrong_width_is_an_error() {
        let (x, y) = data();
        let mut pipeline = Pipeline::new(ModelVersion::V0_3, 0);
        pipeline.fit(&x, &y).unwrap();
        assert!(pipeline.predict(&array![[1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_predictor_trait_object() {
        let (x, y) = data();
        let mut pipeline = Pipeline::new(ModelVersion::V0_1, 0);
        pipeline.fit(&x, &y).unwrap();

        let predictor: &dyn Predictor = &pipeline;
        assert_eq!(predictor.predict(&x).unwrap(), pipeline.predict(&x).unwrap());
    }
}
