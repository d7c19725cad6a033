use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{fixture_scraper::FixtureScraper, types::ErrorReport};

pub const FIKSTUR_PATH: &str = "/api/fikstur";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoints {
    pub fikstur: String,
    pub health: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiIndex {
    pub message: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<FixtureScraper>,
}

impl AppState {
    pub fn new(scraper: FixtureScraper) -> Self {
        Self {
            scraper: Arc::new(scraper),
        }
    }
}

#[axum::debug_handler]
pub async fn index_handler() -> Json<ApiIndex> {
    Json(ApiIndex {
        message: "Karaman FK Fikstür API".to_string(),
        endpoints: Endpoints {
            fikstur: FIKSTUR_PATH.to_string(),
            health: HEALTH_PATH.to_string(),
        },
    })
}

#[axum::debug_handler]
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "API çalışıyor".to_string(),
    })
}

#[axum::debug_handler]
pub async fn fikstur_handler(State(state): State<AppState>) -> Response {
    info!("Fixture request received");
    match state.scraper.fetch_fixtures().await {
        Ok(report) => Json(report).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorReport::new(e.to_string())),
        )
            .into_response(),
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(HEALTH_PATH, get(health_handler))
        .route(FIKSTUR_PATH, get(fikstur_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `addr` until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local_addr = listener.local_addr()?;

    info!("API server listening on http://{}", local_addr);
    info!("Fixture endpoint: http://{}{}", local_addr, FIKSTUR_PATH);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
