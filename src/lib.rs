//! Diabetes Triage - disease progression model trainer and prediction server
//!
//! An offline trainer fits one of a few versioned regression pipelines on the
//! diabetes dataset and writes a model artifact plus a metrics file. A small
//! HTTP server loads that artifact once and answers `/health` and `/predict`.
//!
//! # Modules
//!
//! - [`features`] - Feature contract shared by training and serving
//! - [`preprocessing`] - Feature scaling
//! - [`training`] - Estimators, pipelines, splitting, metrics and the trainer
//! - [`export`] - Model artifact persistence
//! - [`utils`] - Dataset loading
//! - [`server`] - HTTP server
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core ML modules
pub mod features;
pub mod preprocessing;
pub mod training;

// Utilities
pub mod export;
pub mod utils;

// Services
pub mod server;
pub mod cli;

pub use error::{TriageError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{TriageError, Result};
    pub use crate::features::{PatientFeatures, Predictor, FEATURE_NAMES, N_FEATURES};
    pub use crate::preprocessing::StandardScaler;
    pub use crate::training::{
        DataSource, MetricsReport, ModelVersion, Pipeline, Regressor, Trainer, TrainerConfig,
        TrainingReport,
    };
    pub use crate::export::ModelArtifact;
    pub use crate::utils::{DataLoader, Dataset};
    pub use crate::server::{create_router, run_server, AppState, ServerConfig};
}
