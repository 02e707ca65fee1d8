//! Model artifact persistence
//!
//! The artifact is a bincode-encoded envelope around the fitted pipeline. It
//! records the feature order and model version the pipeline was trained
//! with so a loader can refuse an incompatible file instead of serving
//! silently wrong predictions.

use crate::error::{TriageError, Result};
use crate::features::FEATURE_NAMES;
use crate::training::{ModelVersion, Pipeline};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bumped whenever the envelope or pipeline layout changes incompatibly
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serialized form of a fitted pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub model_version: ModelVersion,
    pub feature_names: Vec<String>,
    /// RFC 3339 timestamp of the training run
    pub trained_at: String,
    pub pipeline: Pipeline,
}

impl ModelArtifact {
    /// Wrap a fitted pipeline
    pub fn new(pipeline: Pipeline) -> Result<Self> {
        if !pipeline.is_fitted() {
            return Err(TriageError::ModelNotFitted);
        }
        Ok(Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            model_version: pipeline.version(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            trained_at: chrono::Utc::now().to_rfc3339(),
            pipeline,
        })
    }

    /// Write to `path`, creating parent directories; an existing file is overwritten
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Read and validate an artifact
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let artifact: Self = bincode::deserialize(&bytes).map_err(|e| {
            TriageError::Artifact(format!("{} is not a valid model artifact: {}", path.display(), e))
        })?;
        artifact.validate()?;
        Ok(artifact)
    }

    fn validate(&self) -> Result<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(TriageError::Artifact(format!(
                "unsupported artifact format version {} (expected {})",
                self.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }
        if self.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
            return Err(TriageError::Artifact(format!(
                "artifact feature order [{}] does not match serving order [{}]",
                self.feature_names.join(", "),
                FEATURE_NAMES.join(", ")
            )));
        }
        if !self.pipeline.is_fitted() {
            return Err(TriageError::ModelNotFitted);
        }
        Ok(())
    }

    pub fn into_pipeline(self) -> Pipeline {
        self.pipeline
    }
}
