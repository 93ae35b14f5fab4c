//! HTTP host
//!
//! Routes:
//! - `POST /render-pdf-form`: render an interactive PDF form
//! - `POST /document-of-record`: render a read-only document of record
//! - `GET /health`: liveness probe

mod extract;
mod handlers;
pub mod response;

pub use extract::FormRequest;

use crate::engine::{DorEngine, RemoteEngine, RemoteEngineConfig, RenderEngine};
use crate::error::{Error, Result};
use crate::template::{FsResourceLookup, ResourceLookup};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use url::Url;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:8080)
    pub bind_addr: SocketAddr,
    /// Directories templates may be read from; empty means unrestricted
    pub template_dirs: Vec<PathBuf>,
    /// Base URL of the upstream rendering engine
    pub engine_url: Option<Url>,
    /// Timeout for one engine call (default: 60s)
    pub engine_timeout: Duration,
    /// Maximum size of a rendered document (default: 100MB)
    pub max_engine_response_bytes: u64,
    /// Maximum size of an inbound request body (default: 32MB)
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            template_dirs: Vec::new(),
            engine_url: None,
            engine_timeout: Duration::from_secs(60),
            max_engine_response_bytes: 100 * 1024 * 1024, // 100MB
            max_request_bytes: 32 * 1024 * 1024,          // 32MB
        }
    }
}

/// Collaborators shared by every request. Immutable once built.
#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<dyn ResourceLookup>,
    pub render_engine: Arc<dyn RenderEngine>,
    pub dor_engine: Arc<dyn DorEngine>,
}

impl AppState {
    pub fn new(
        lookup: Arc<dyn ResourceLookup>,
        render_engine: Arc<dyn RenderEngine>,
        dor_engine: Arc<dyn DorEngine>,
    ) -> Self {
        Self {
            lookup,
            render_engine,
            dor_engine,
        }
    }

    /// Filesystem templates and a remote engine, as described by `config`.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let base_url = config.engine_url.clone().ok_or_else(|| Error::Internal {
            reason: "no rendering engine URL configured".to_string(),
        })?;
        let engine = RemoteEngine::new(RemoteEngineConfig {
            base_url,
            timeout: config.engine_timeout,
            max_response_bytes: config.max_engine_response_bytes,
        })
        .map_err(|e| Error::Internal {
            reason: format!("failed to build rendering engine client: {}", e),
        })?;
        let engine = Arc::new(engine);

        Ok(Self::new(
            Arc::new(FsResourceLookup::new(config.template_dirs.clone())),
            engine.clone(),
            engine,
        ))
    }
}

/// Build the application router.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/render-pdf-form", post(handlers::render_pdf_form))
        .route("/document-of-record", post(handlers::document_of_record))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(config.max_request_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server with default configuration
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::default()).await
}

/// Run the server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config)?;
    let app = router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        template_dirs = ?config.template_dirs,
        "PDF forms server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("PDF forms server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.engine_timeout, Duration::from_secs(60));
        assert_eq!(config.max_engine_response_bytes, 100 * 1024 * 1024);
        assert_eq!(config.max_request_bytes, 32 * 1024 * 1024);
        assert!(config.engine_url.is_none());
    }

    #[test]
    fn test_state_requires_engine_url() {
        let result = AppState::from_config(&ServerConfig::default());
        assert!(matches!(result, Err(Error::Internal { .. })));
    }

    #[test]
    fn test_state_from_config() {
        let config = ServerConfig {
            engine_url: Some(Url::parse("http://127.0.0.1:4502/engine").unwrap()),
            ..ServerConfig::default()
        };
        assert!(AppState::from_config(&config).is_ok());
    }
}
