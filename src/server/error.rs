//! Error types for the server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::error::Error as StdError;
use thiserror::Error;

use crate::error::TriageError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Model not available")]
    ModelUnavailable,

    #[error("{error}")]
    Prediction { error: String, trace: String },

    #[error(transparent)]
    Rejection(#[from] JsonRejection),
}

impl ServerError {
    /// Capture a prediction failure with its full source chain
    pub fn prediction(err: &TriageError) -> Self {
        let mut lines = vec![format!("{:?}", err)];
        let mut source = err.source();
        while let Some(cause) = source {
            lines.push(format!("caused by: {}", cause));
            source = cause.source();
        }
        ServerError::Prediction {
            error: err.to_string(),
            trace: lines.join("\n"),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ServerError::ModelUnavailable => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Model not available" }),
            ),
            ServerError::Prediction { error, trace } => {
                tracing::error!(error = %error, trace = %trace, "Prediction failed");
                (StatusCode::BAD_REQUEST, json!({ "error": error, "trace": trace }))
            }
            ServerError::Rejection(rejection) => {
                (rejection.status(), json!({ "error": rejection.body_text() }))
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
