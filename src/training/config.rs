//! Training configuration

use crate::error::{TriageError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Named model recipe. Each version fixes a scaler + regressor combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelVersion {
    /// StandardScaler + ordinary least squares
    V0_1,
    /// StandardScaler + random forest (200 trees)
    V0_2,
    /// StandardScaler + ridge regression (alpha = 1.0)
    V0_3,
}

impl ModelVersion {
    /// All supported versions, oldest first
    pub const ALL: [ModelVersion; 3] = [ModelVersion::V0_1, ModelVersion::V0_2, ModelVersion::V0_3];

    /// Version label as used on the command line and in metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVersion::V0_1 => "v0.1",
            ModelVersion::V0_2 => "v0.2",
            ModelVersion::V0_3 => "v0.3",
        }
    }

    /// Short human-readable description of the estimator
    pub fn description(&self) -> &'static str {
        match self {
            ModelVersion::V0_1 => "StandardScaler + LinearRegression",
            ModelVersion::V0_2 => "StandardScaler + RandomForestRegressor(n_estimators=200)",
            ModelVersion::V0_3 => "StandardScaler + Ridge(alpha=1.0)",
        }
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVersion {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self> {
        ModelVersion::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ModelVersion::ALL.iter().map(|v| v.as_str()).collect();
                TriageError::Config(format!(
                    "Unknown version '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

/// Where the training rows come from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataSource {
    /// Diabetes dataset compiled into the binary
    #[default]
    Bundled,
    /// CSV file with the feature columns and a `target` column
    Csv(PathBuf),
}

/// Configuration for one training run
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Version label; validated before any data is loaded
    pub version: String,
    /// Seed for the split and any stochastic estimator
    pub seed: u64,
    /// Held-out fraction in (0, 1)
    pub test_size: f64,
    /// Output path for the fitted pipeline
    pub model_path: PathBuf,
    /// Output path for the metrics JSON
    pub metrics_path: PathBuf,
    pub data: DataSource,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            version: ModelVersion::V0_1.as_str().to_string(),
            seed: 42,
            test_size: 0.2,
            model_path: PathBuf::from("models/model.bin"),
            metrics_path: PathBuf::from("out/metrics.json"),
            data: DataSource::Bundled,
        }
    }
}

impl TrainerConfig {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_outputs(mut self, model_path: impl Into<PathBuf>, metrics_path: impl Into<PathBuf>) -> Self {
        self.model_path = model_path.into();
        self.metrics_path = metrics_path.into();
        self
    }

    pub fn with_data(mut self, data: DataSource) -> Self {
        self.data = data;
        self
    }

    /// Check everything that can be checked without touching data or disk
    pub fn validate(&self) -> Result<ModelVersion> {
        let version = self.version.parse::<ModelVersion>()?;
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(TriageError::Config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        assert_eq!("v0.1".parse::<ModelVersion>().unwrap(), ModelVersion::V0_1);
        assert_eq!("v0.2".parse::<ModelVersion>().unwrap(), ModelVersion::V0_2);
        assert_eq!("v0.3".parse::<ModelVersion>().unwrap(), ModelVersion::V0_3);
    }

    #[test]
    fn test_unknown_version() {
        let err = "v1.0".parse::<ModelVersion>().unwrap_err();
        assert!(matches!(err, TriageError::Config(_)));
        assert!(err.to_string().contains("v1.0"));
    }

    #[test]
    fn test_display_round_trip() {
        for v in ModelVersion::ALL {
            assert_eq!(v.to_string().parse::<ModelVersion>().unwrap(), v);
        }
    }

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.version, "v0.1");
        assert_eq!(config.seed, 42);
        assert_eq!(config.test_size, 0.2);
        assert_eq!(config.data, DataSource::Bundled);
    }

    #[test]
    fn test_validate_test_size() {
        assert!(TrainerConfig::new("v0.1").with_test_size(0.0).validate().is_err());
        assert!(TrainerConfig::new("v0.1").with_test_size(1.0).validate().is_err());
        assert!(TrainerConfig::new("v0.1").with_test_size(f64::NAN).validate().is_err());
        assert!(TrainerConfig::new("v0.1").with_test_size(0.3).validate().is_ok());
    }
}
