//! Error types for the triage trainer and server

use thiserror::Error;

/// Result type alias for triage operations
pub type Result<T> = std::result::Result<T, TriageError>;

/// Main error type shared by the trainer, the artifact store and the predictor
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Artifact error: {0}")]
    Artifact(String),
}

impl From<polars::error::PolarsError> for TriageError {
    fn from(err: polars::error::PolarsError) -> Self {
        TriageError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for TriageError {
    fn from(err: serde_json::Error) -> Self {
        TriageError::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for TriageError {
    fn from(err: bincode::Error) -> Self {
        TriageError::Serialization(err.to_string())
    }
}

impl From<ndarray::ShapeError> for TriageError {
    fn from(err: ndarray::ShapeError) -> Self {
        TriageError::Shape {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
