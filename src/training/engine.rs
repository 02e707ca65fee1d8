//! Training run: validate, load, split, fit, evaluate, persist

use crate::error::Result;
use crate::export::ModelArtifact;
use crate::utils::{DataLoader, Dataset};
use super::config::{DataSource, ModelVersion, TrainerConfig};
use super::metrics::{MetricsReport, RegressionMetrics};
use super::pipeline::Pipeline;
use super::split::train_test_split;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub metrics: MetricsReport,
    pub model_path: PathBuf,
    pub metrics_path: PathBuf,
    pub training_time_secs: f64,
}

/// Offline trainer producing a model artifact and a metrics file
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Run end to end. Configuration errors surface before any data is read.
    pub fn run(&self) -> Result<TrainingReport> {
        let version = self.config.validate()?;
        let start = Instant::now();

        let dataset = self.load_data()?;
        let (pipeline, metrics) = self.fit_and_evaluate(version, &dataset)?;

        ModelArtifact::new(pipeline)?.save(&self.config.model_path)?;
        info!(path = %self.config.model_path.display(), "Saved model");

        metrics.save(&self.config.metrics_path)?;
        info!(path = %self.config.metrics_path.display(), "Saved metrics");

        Ok(TrainingReport {
            metrics,
            model_path: self.config.model_path.clone(),
            metrics_path: self.config.metrics_path.clone(),
            training_time_secs: start.elapsed().as_secs_f64(),
        })
    }

    /// Split, fit and score without touching the filesystem
    pub fn fit_and_evaluate(
        &self,
        version: ModelVersion,
        dataset: &Dataset,
    ) -> Result<(Pipeline, MetricsReport)> {
        let split = train_test_split(&dataset.x, &dataset.y, self.config.test_size, self.config.seed)?;
        info!(
            version = %version,
            estimator = version.description(),
            n_train = split.n_train(),
            n_test = split.n_test(),
            seed = self.config.seed,
            "Fitting pipeline"
        );

        let mut pipeline = Pipeline::new(version, self.config.seed);
        pipeline.fit(&split.x_train, &split.y_train)?;

        let y_pred = pipeline.predict(&split.x_test)?;
        let scores = RegressionMetrics::compute(&split.y_test, &y_pred)?;
        info!(rmse = scores.rmse, mae = scores.mae, r2 = scores.r2, "Held-out evaluation");

        let metrics = MetricsReport {
            version: version.as_str().to_string(),
            rmse: scores.rmse,
            seed: self.config.seed,
            n_train: split.n_train(),
            n_test: split.n_test(),
            test_size: self.config.test_size,
            mae: scores.mae,
            r2: scores.r2,
        };

        Ok((pipeline, metrics))
    }

    fn load_data(&self) -> Result<Dataset> {
        let loader = DataLoader::new();
        match &self.config.data {
            DataSource::Bundled => loader.load_bundled(),
            DataSource::Csv(path) => loader.load_csv(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TriageError;

    #[test]
    fn test_unknown_version_fails_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("model.bin");
        let metrics_path = dir.path().join("metrics.json");

        let config = TrainerConfig::new("v9.9")
            .with_outputs(&model_path, &metrics_path)
            .with_data(DataSource::Csv(dir.path().join("does-not-exist.csv")));
        let err = Trainer::new(config).run().unwrap_err();

        // a data error would mean the loader ran first
        assert!(matches!(err, TriageError::Config(_)));
        assert!(!model_path.exists());
        assert!(!metrics_path.exists());
    }

    #[test]
    fn test_fit_and_evaluate_counts() {
        let dataset = DataLoader::new().load_bundled().unwrap();
        let trainer = Trainer::new(TrainerConfig::new("v0.1"));
        let (pipeline, metrics) = trainer.fit_and_evaluate(ModelVersion::V0_1, &dataset).unwrap();

        assert!(pipeline.is_fitted());
        assert_eq!(metrics.n_train + metrics.n_test, 442);
        assert_eq!(metrics.n_test, 89);
        assert!(metrics.rmse.is_finite() && metrics.rmse >= 0.0);
    }
}
