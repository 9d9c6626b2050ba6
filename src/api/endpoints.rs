//! API endpoint handlers
//!
//! This module implements the HTTP endpoints a home-automation host polls to
//! read the modem sensors, plus a health check and a manual refresh trigger.

use crate::core::config::Config;
use crate::core::poller::{Poller, UpdateOutcome};
use crate::models::sensor::SensorKind;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub poller: Arc<Poller>,
}

/// Create the API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/sensors", get(list_sensors))
        .route("/sensors/{key}", get(get_sensor))
        .route("/refresh", post(refresh))
        .with_state(state)
}

/// GET / - Root endpoint
async fn root(State(state): State<AppState>) -> impl IntoResponse {
    let sensors: Vec<&str> = state.config.sensors.iter().map(|k| k.key()).collect();

    Json(json!({
        "message": format!("PK5001Z Modem Monitor v{}", env!("CARGO_PKG_VERSION")),
        "status": "running",
        "modem": {
            "host": state.config.modem_host,
            "port": state.config.modem_port,
            "scan_interval": state.config.scan_interval,
        },
        "sensors": sensors,
        "endpoints": {
            "sensors": "/sensors",
            "sensor": "/sensors/{key}",
            "refresh": "/refresh",
            "health": "/health",
        },
    }))
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.poller.snapshot().await;
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "logged_in": snapshot.logged_in,
        "has_data": snapshot.status.is_some(),
        "last_updated": snapshot.updated_at.map(|t| t.to_rfc3339()),
    }))
}

/// GET /sensors - All configured sensor readings
async fn list_sensors(State(state): State<AppState>) -> impl IntoResponse {
    let readings = state.poller.readings(&state.config.sensors).await;
    debug!("Serving {} sensor readings", readings.len());
    Json(readings)
}

/// GET /sensors/{key} - One sensor reading
async fn get_sensor(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let kind = match SensorKind::from_key(&key) {
        Some(kind) if state.config.sensors.contains(&kind) => kind,
        _ => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": format!("Unknown sensor: {}", key),
                })),
            )
                .into_response();
        }
    };

    let mut readings = state.poller.readings(&[kind]).await;
    match readings.pop() {
        Some(reading) => Json(reading).into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

/// POST /refresh - Trigger a (throttled) refresh
async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    let outcome = state.poller.update().await;
    info!("Manual refresh: {:?}", outcome);

    let snapshot = state.poller.snapshot().await;
    Json(json!({
        "outcome": outcome,
        "refreshed": outcome == UpdateOutcome::Refreshed,
        "last_updated": snapshot.updated_at.map(|t| t.to_rfc3339()),
    }))
}
