//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::TriageError;
use crate::features::{PatientFeatures, Predictor};

use super::error::{Result, ServerError};
use super::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: f64,
    pub model_version: String,
}

// ============================================================================
// Health
// ============================================================================

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model_version = state.config.model_version.clone();
    let response = if state.is_ready() {
        HealthResponse {
            status: "ok".to_string(),
            model_version,
            error: None,
        }
    } else {
        HealthResponse {
            status: "error".to_string(),
            model_version,
            error: Some(state.unavailable_reason()),
        }
    };
    Json(response)
}

// ============================================================================
// Prediction
// ============================================================================

/// The availability check runs before the body is looked at, so a server
/// without a model answers 500 for any payload.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<PatientFeatures>, JsonRejection>,
) -> Result<Json<PredictionResponse>> {
    let model = state.model().ok_or(ServerError::ModelUnavailable)?;
    let Json(features) = payload?;

    match predict_one(model.as_ref(), &features) {
        Ok(prediction) => Ok(Json(PredictionResponse {
            prediction,
            model_version: state.config.model_version.clone(),
        })),
        Err(e) => Err(ServerError::prediction(&e)),
    }
}

/// Run the model on a single record and take the first output
pub fn predict_one(
    model: &dyn Predictor,
    features: &PatientFeatures,
) -> std::result::Result<f64, TriageError> {
    let predictions = model.predict(&features.to_batch())?;
    predictions
        .first()
        .copied()
        .ok_or_else(|| TriageError::Prediction("model returned no predictions".to_string()))
}

// ============================================================================
// Fallbacks
// ============================================================================

pub async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found. Available endpoints: GET /health, POST /predict" })),
    )
}

pub async fn handle_405() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}
