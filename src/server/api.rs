//! API route definitions

use std::sync::Arc;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, state::AppState};

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());
    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .fallback(handlers::handle_404)
        .method_not_allowed_fallback(handlers::handle_405)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// A configured origin restricts CORS to it; otherwise any origin is allowed
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => cors.allow_origin(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS_ORIGIN");
                cors.allow_origin(Any)
            }
        },
        None => cors.allow_origin(Any),
    }
}
