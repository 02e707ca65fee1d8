//! Feature contract shared by the trainer and the server
//!
//! The model is trained on columns in [`FEATURE_NAMES`] order and the server
//! must hand it rows in exactly that order. Nothing else enforces this, so
//! every conversion from a named record to a row goes through this module.

use crate::error::Result;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Number of input features
pub const N_FEATURES: usize = 10;

/// Feature names in training-time column order
pub const FEATURE_NAMES: [&str; N_FEATURES] =
    ["age", "sex", "bmi", "bp", "s1", "s2", "s3", "s4", "s5", "s6"];

/// Name of the label column in training data
pub const TARGET_COLUMN: &str = "target";

/// One patient record as accepted by `/predict`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    pub age: f64,
    pub sex: f64,
    pub bmi: f64,
    pub bp: f64,
    pub s1: f64,
    pub s2: f64,
    pub s3: f64,
    pub s4: f64,
    pub s5: f64,
    pub s6: f64,
}

impl PatientFeatures {
    /// Look up a field by its feature name
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "age" => self.age,
            "sex" => self.sex,
            "bmi" => self.bmi,
            "bp" => self.bp,
            "s1" => self.s1,
            "s2" => self.s2,
            "s3" => self.s3,
            "s4" => self.s4,
            "s5" => self.s5,
            "s6" => self.s6,
            _ => return None,
        };
        Some(value)
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn to_vector(&self) -> [f64; N_FEATURES] {
        [
            self.age, self.sex, self.bmi, self.bp, self.s1,
            self.s2, self.s3, self.s4, self.s5, self.s6,
        ]
    }

    /// Single-row batch suitable for [`Predictor::predict`]
    pub fn to_batch(&self) -> Array2<f64> {
        let row = self.to_vector();
        Array2::from_shape_fn((1, N_FEATURES), |(_, c)| row[c])
    }
}

/// The one capability the server needs from a fitted model
pub trait Predictor: Send + Sync {
    /// Predict one value per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PatientFeatures {
        PatientFeatures {
            age: 0.02,
            sex: -0.044,
            bmi: 0.06,
            bp: -0.03,
            s1: -0.02,
            s2: 0.03,
            s3: -0.02,
            s4: 0.02,
            s5: 0.02,
            s6: -0.001,
        }
    }

    #[test]
    fn test_vector_follows_feature_names() {
        let record = sample();
        let row = record.to_vector();
        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            assert_eq!(row[i], record.get(name).unwrap(), "mismatch at {}", name);
        }
    }

    #[test]
    fn test_batch_shape() {
        let batch = sample().to_batch();
        assert_eq!(batch.dim(), (1, N_FEATURES));
        assert_eq!(batch[[0, 2]], 0.06);
        assert_eq!(batch[[0, 9]], -0.001);
    }

    #[test]
    fn test_unknown_name() {
        assert!(sample().get("glucose").is_none());
    }

    #[test]
    fn test_deserialize_ignores_field_order() {
        let json = r#"{"s6": -0.001, "s5": 0.02, "s4": 0.02, "s3": -0.02, "s2": 0.03,
                       "s1": -0.02, "bp": -0.03, "bmi": 0.06, "sex": -0.044, "age": 0.02}"#;
        let record: PatientFeatures = serde_json::from_str(json).unwrap();
        assert_eq!(record, sample());
    }

    #[test]
    fn test_deserialize_rejects_missing_field() {
        let json = r#"{"age": 0.02, "sex": -0.044}"#;
        assert!(serde_json::from_str::<PatientFeatures>(json).is_err());
    }
}
