//! Application state

use std::sync::Arc;
use tracing::{info, warn};

use crate::export::ModelArtifact;
use crate::features::Predictor;

use super::ServerConfig;

/// Shared, read-only state. The model slot is decided once at startup.
pub struct AppState {
    pub config: ServerConfig,
    model: Option<Arc<dyn Predictor>>,
}

impl AppState {
    /// Load the artifact at `config.model_path`. Failure leaves the slot empty.
    pub fn load(config: ServerConfig) -> Self {
        match ModelArtifact::load(&config.model_path) {
            Ok(artifact) => {
                if artifact.model_version.as_str() != config.model_version {
                    warn!(
                        artifact_version = %artifact.model_version,
                        configured_version = %config.model_version,
                        "Artifact was trained as a different version than the configured label"
                    );
                }
                info!(
                    path = %config.model_path.display(),
                    artifact_version = %artifact.model_version,
                    trained_at = %artifact.trained_at,
                    "Model loaded"
                );
                let model: Arc<dyn Predictor> = Arc::new(artifact.into_pipeline());
                Self::with_model(config, model)
            }
            Err(e) => {
                warn!(
                    path = %config.model_path.display(),
                    error = %e,
                    "Model could not be loaded, serving without a model"
                );
                Self::without_model(config)
            }
        }
    }

    pub fn with_model(config: ServerConfig, model: Arc<dyn Predictor>) -> Self {
        Self {
            config,
            model: Some(model),
        }
    }

    pub fn without_model(config: ServerConfig) -> Self {
        Self { config, model: None }
    }

    pub fn model(&self) -> Option<&Arc<dyn Predictor>> {
        self.model.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    pub fn unavailable_reason(&self) -> String {
        format!("model not loaded at {}", self.config.model_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.bin");
        let state = AppState::load(ServerConfig::new(&path, "v0.1"));

        assert!(!state.is_ready());
        assert_eq!(
            state.unavailable_reason(),
            format!("model not loaded at {}", path.display())
        );
    }

    #[test]
    fn test_corrupt_artifact_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"garbage").unwrap();

        assert!(!AppState::load(ServerConfig::new(&path, "v0.1")).is_ready());
    }
}
