//! Service Orders API
//!
//! Open, list, fetch and update service orders. Any authenticated user may
//! act on any order.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::api::common::AppJson;
use crate::api::middleware::Authenticated;
use crate::domain::{NewServiceOrder, ServiceOrder, ServiceOrderPatch};
use crate::error::PlatformError;
use crate::service::ServiceOrderWorkflow;

#[derive(Clone)]
pub struct ServiceOrdersState {
    pub workflow: Arc<ServiceOrderWorkflow>,
}

/// Open a service order
#[utoipa::path(
    post,
    path = "/api/service-orders",
    tag = "service-orders",
    request_body = NewServiceOrder,
    responses(
        (status = 200, description = "Service order created", body = ServiceOrder),
        (status = 400, description = "Validation error", body = crate::api::common::ApiError),
        (status = 401, description = "Not authenticated", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_service_order(
    State(state): State<ServiceOrdersState>,
    auth: Authenticated,
    AppJson(req): AppJson<NewServiceOrder>,
) -> Result<Json<ServiceOrder>, PlatformError> {
    let order = state.workflow.create(req, &auth.0).await?;
    Ok(Json(order))
}

/// List service orders (at most 1000, unordered)
#[utoipa::path(
    get,
    path = "/api/service-orders",
    tag = "service-orders",
    responses(
        (status = 200, description = "Service orders", body = Vec<ServiceOrder>),
        (status = 401, description = "Not authenticated", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_service_orders(
    State(state): State<ServiceOrdersState>,
    _auth: Authenticated,
) -> Result<Json<Vec<ServiceOrder>>, PlatformError> {
    Ok(Json(state.workflow.list().await?))
}

/// Get a service order by id
#[utoipa::path(
    get,
    path = "/api/service-orders/{id}",
    tag = "service-orders",
    params(("id" = String, Path, description = "Service order id")),
    responses(
        (status = 200, description = "Service order found", body = ServiceOrder),
        (status = 404, description = "Service order not found", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_service_order(
    State(state): State<ServiceOrdersState>,
    _auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<ServiceOrder>, PlatformError> {
    Ok(Json(state.workflow.get(&id).await?))
}

/// Update a service order
///
/// Only the fields present in the body are written.
#[utoipa::path(
    put,
    path = "/api/service-orders/{id}",
    tag = "service-orders",
    params(("id" = String, Path, description = "Service order id")),
    request_body = ServiceOrderPatch,
    responses(
        (status = 200, description = "Service order updated", body = ServiceOrder),
        (status = 400, description = "Validation error", body = crate::api::common::ApiError),
        (status = 404, description = "Service order not found", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_service_order(
    State(state): State<ServiceOrdersState>,
    auth: Authenticated,
    Path(id): Path<String>,
    AppJson(patch): AppJson<ServiceOrderPatch>,
) -> Result<Json<ServiceOrder>, PlatformError> {
    let order = state.workflow.update(&id, patch, &auth.0).await?;
    Ok(Json(order))
}

pub fn service_orders_router(state: ServiceOrdersState) -> Router {
    Router::new()
        .route("/", get(list_service_orders).post(create_service_order))
        .route("/:id", get(get_service_order).put(update_service_order))
        .with_state(state)
}
