//! Audiosync Web Server - Axum HTTP front end
//!
//! Exposes file alignment over HTTP. Alignment is CPU-bound, so each request
//! runs on tokio's blocking pool; the service itself holds no mutable state.

pub mod api;
pub mod auth;

use audiosync_core::SyncProcessor;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

/// Shared application state accessible from all handlers
#[derive(Clone)]
pub struct AppState {
    /// File decoder and aligner
    pub processor: Arc<SyncProcessor>,
    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new AppState around the given processor
    pub fn new(processor: SyncProcessor, config: ServerConfig) -> Self {
        Self {
            processor: Arc::new(processor),
            config,
        }
    }
}

/// Server configuration
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Bind address
    pub bind_addr: String,
    /// Key required in the `APIKEY` header of protected endpoints (None = open)
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5009,
            bind_addr: "0.0.0.0".to_string(),
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `APIKEY` from the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a variable lookup, keeping defaults for missing
    /// or unparsable values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid PORT, using default");
                defaults.port
            }),
            None => defaults.port,
        };
        Self {
            port,
            bind_addr: lookup("HOST")
                .filter(|h| !h.trim().is_empty())
                .unwrap_or(defaults.bind_addr),
            api_key: lookup("APIKEY").filter(|k| !k.is_empty()),
        }
    }
}

/// Build the Axum router with all routes
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/sync", post(api::sync_audio))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health_check))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}

/// Serve on an already bound listener until Ctrl+C
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Bind the configured address and serve
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.bind_addr, state.config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(
        %addr,
        auth = state.config.api_key.is_some(),
        "Audiosync web server listening"
    );
    serve(listener, state).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("Shutdown requested");
    }
}
