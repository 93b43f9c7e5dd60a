//! Health endpoints
//!
//! Liveness never touches the store; readiness pings it.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use utoipa::ToSchema;

use crate::repository::StoreHealth;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Clone)]
pub struct HealthState {
    pub store: Arc<dyn StoreHealth>,
}

/// Process is up
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "monitoring",
    responses((status = 200, description = "Process is up", body = HealthResponse))
)]
pub async fn live() -> Json<HealthResponse> {
    Json(HealthResponse::new("UP"))
}

/// Store is reachable
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "monitoring",
    responses(
        (status = 200, description = "Ready to serve", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn ready(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::new("READY"))),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::new("DOWN")))
        }
    }
}

pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(live))
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
        .with_state(state)
}
