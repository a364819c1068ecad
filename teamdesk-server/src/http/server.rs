//! Axum server setup
//!
//! Router assembly, middleware stack, and graceful shutdown on
//! SIGTERM/Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, StatusCode, Uri};
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::Router;
use sqlx::PgPool;
use teamdesk_core::config::TeamSettings;
use teamdesk_core::TeamdeskConfig;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::chat::ChatModel;
use crate::db::Person;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8000)
    pub bind_addr: SocketAddr,

    /// Allowed origins; empty allows any origin
    pub cors_origins: Vec<String>,

    /// Requests running longer than this get 408
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn from_config(config: &TeamdeskConfig) -> Result<Self, ServerError> {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        let bind_addr = addr
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr.clone()))?;

        Ok(Self {
            bind_addr,
            cors_origins: config.server.cors_origins.clone(),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        })
    }
}

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub chat: Arc<dyn ChatModel>,
    pub team: TeamSettings,
}

impl AppState {
    pub fn new(pool: PgPool, chat: Arc<dyn ChatModel>, team: TeamSettings) -> Self {
        Self { pool, chat, team }
    }

    /// Owner stamped on records created through the API.
    pub fn default_owner(&self) -> Person {
        Person::new(&self.team.default_owner_name, &self.team.default_owner_avatar)
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|_| ServerError::InvalidOrigin(o.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: "route",
        id: uri.path().to_string(),
    }
}

/// The timeout layer answers with a bare 408; give it the API error body.
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout.into_response();
    }
    response
}

/// Assemble the full application router.
pub fn build_router(state: AppState, config: &ServerConfig) -> Result<Router, ServerError> {
    let api = Router::new()
        .merge(routes::leads::router())
        .merge(routes::deals::router())
        .merge(routes::contacts::router())
        .merge(routes::activity::router())
        .merge(routes::tasks::router())
        .merge(routes::products::router())
        .merge(routes::bookmarks::router())
        .merge(routes::users::router())
        .merge(routes::reports::router())
        .merge(routes::chat::router())
        .merge(routes::auth::router());

    let app = Router::new()
        .merge(routes::health::router())
        .nest("/api", api)
        .fallback(unknown_route)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(map_response(timeout_body))
        .layer(cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    Ok(app)
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run_server(state: AppState, config: ServerConfig) -> Result<(), ServerError> {
    if config.cors_origins.is_empty() {
        tracing::info!("CORS: any origin allowed");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: restricted origins");
    }

    let app = build_router(state, &config)?;

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Backend server is listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatError;
    use crate::http::test_support::{app, app_with_config, get, post};
    use async_trait::async_trait;
    use serde_json::json;

    struct SlowChat;

    #[async_trait]
    impl ChatModel for SlowChat {
        async fn send(&self, _prompt: &str) -> Result<String, ChatError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn config_from_settings() {
        let mut settings = TeamdeskConfig::default();
        settings.server.host = "127.0.0.1".into();
        settings.server.port = 9100;
        settings.server.request_timeout_secs = 5;

        let config = ServerConfig::from_config(&settings).unwrap();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 9100)));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_host_is_rejected() {
        let mut settings = TeamdeskConfig::default();
        settings.server.host = "not a host".into();
        assert!(matches!(
            ServerConfig::from_config(&settings),
            Err(ServerError::InvalidAddress(_))
        ));
    }

    #[test]
    fn cors_origins_must_be_header_values() {
        assert!(cors_layer(&[]).is_ok());
        assert!(cors_layer(&["https://teamdesk.example.com".into()]).is_ok());
        assert!(matches!(
            cors_layer(&["bad\norigin".into()]),
            Err(ServerError::InvalidOrigin(_))
        ));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let (status, json) = get(app(), "/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Not Found");
        assert_eq!(json["details"], "route '/api/nope' not found");
    }

    #[tokio::test]
    async fn database_failures_are_500_with_details() {
        let (status, json) = get(app(), "/api/leads").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Internal Server Error");
        assert!(json["details"].as_str().is_some_and(|d| !d.is_empty()));
    }

    #[tokio::test]
    async fn timeout_uses_error_body() {
        let config = ServerConfig {
            request_timeout: Duration::from_millis(50),
            ..ServerConfig::default()
        };
        let app = app_with_config(Arc::new(SlowChat), &config);

        let (status, json) = post(app, "/api/chat", json!({ "query": "hello" })).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(json["error"], "Request Timeout");
        assert_eq!(json["details"], "request timed out");
    }
}
