//! Prediction server
//!
//! Serves one model artifact over HTTP. The artifact is loaded once at
//! startup; if loading fails the server still comes up and reports the
//! problem through `/health`.

mod api;
mod error;
pub mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

pub const DEFAULT_MODEL_PATH: &str = "models/model.bin";
pub const DEFAULT_MODEL_VERSION: &str = "v0.1";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Artifact to load at startup (`MODEL_PATH`)
    pub model_path: PathBuf,
    /// Label reported in responses (`MODEL_VERSION`)
    pub model_version: String,
    /// Allowed CORS origin (`CORS_ORIGIN`); `None` allows any
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ServerConfig {
    pub fn new(model_path: impl Into<PathBuf>, model_version: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            model_path: model_path.into(),
            model_version: model_version.into(),
            cors_origin: None,
        }
    }

    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    /// Read `API_HOST`, `API_PORT`, `MODEL_PATH`, `MODEL_VERSION` and `CORS_ORIGIN`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(
            lookup("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
            lookup("MODEL_VERSION").unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string()),
        );
        if let Some(host) = lookup("API_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("API_PORT").and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        config.cors_origin = lookup("CORS_ORIGIN").filter(|o| !o.is_empty() && o != "*");
        config
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();

    let state = Arc::new(AppState::load(config.clone()));
    let app = create_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        model_path = %config.model_path.display(),
        model_version = %config.model_version,
        model_loaded = state.is_ready(),
        started_at = %start_time.to_rfc3339(),
        "Prediction server starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install ctrl+c handler, running until killed");
            std::future::pending::<()>().await;
        }
        let stop_time = chrono::Utc::now();
        let uptime = stop_time.signed_duration_since(start_time);
        info!(
            stopped_at = %stop_time.to_rfc3339(),
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
