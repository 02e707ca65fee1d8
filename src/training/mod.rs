//! Model training
//!
//! Every model version is a [`Pipeline`]: z-score scaling followed by one of
//! - ordinary least squares (`v0.1`),
//! - a random forest regressor (`v0.2`),
//! - ridge regression (`v0.3`).
//!
//! [`Trainer`] runs the whole offline job: validate the configuration, load
//! data, split with a seed, fit, score on the held-out rows, and write the
//! artifact plus a metrics file.

mod config;
mod engine;
pub mod decision_tree;
pub mod linear_models;
pub mod metrics;
pub mod pipeline;
pub mod random_forest;
pub mod split;

pub use config::{DataSource, ModelVersion, TrainerConfig};
pub use engine::{Trainer, TrainingReport};
pub use decision_tree::{DecisionTreeRegressor, TreeNode};
pub use linear_models::{LinearRegression, RidgeRegression};
pub use metrics::{rmse, MetricsReport, RegressionMetrics};
pub use pipeline::{Pipeline, Regressor};
pub use random_forest::RandomForestRegressor;
pub use split::{train_test_split, Split};
