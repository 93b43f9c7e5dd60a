//! Dashboard API

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::api::middleware::Authenticated;
use crate::domain::DashboardSummary;
use crate::error::PlatformError;
use crate::service::AggregationReporter;

#[derive(Clone)]
pub struct DashboardState {
    pub reporter: Arc<AggregationReporter>,
}

/// Counts by status, technician and priority
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardSummary),
        (status = 401, description = "Not authenticated", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    _auth: Authenticated,
) -> Result<Json<DashboardSummary>, PlatformError> {
    Ok(Json(state.reporter.summary().await?))
}

pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .with_state(state)
}
