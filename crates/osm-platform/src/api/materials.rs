//! Materials API
//!
//! Material requisitions attached to service orders.

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::api::common::AppJson;
use crate::api::middleware::Authenticated;
use crate::domain::{Material, MaterialStatus, NewMaterial};
use crate::error::PlatformError;
use crate::service::MaterialWorkflow;

/// Material list filter
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MaterialListQuery {
    /// Only materials of this service order
    pub os_id: Option<String>,
}

/// Material status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct MaterialStatusRequest {
    pub status: MaterialStatus,

    /// Accepted for compatibility; the authenticated user is recorded instead.
    #[serde(default)]
    pub aprovado_por: Option<String>,
}

#[derive(Clone)]
pub struct MaterialsState {
    pub workflow: Arc<MaterialWorkflow>,
}

/// Request a material
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = "materials",
    request_body = NewMaterial,
    responses(
        (status = 200, description = "Material requested", body = Material),
        (status = 400, description = "Validation error", body = crate::api::common::ApiError),
        (status = 401, description = "Not authenticated", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_material(
    State(state): State<MaterialsState>,
    auth: Authenticated,
    AppJson(req): AppJson<NewMaterial>,
) -> Result<Json<Material>, PlatformError> {
    let material = state.workflow.create(req, &auth.0).await?;
    Ok(Json(material))
}

/// List materials, optionally for one service order
#[utoipa::path(
    get,
    path = "/api/materials",
    tag = "materials",
    params(MaterialListQuery),
    responses(
        (status = 200, description = "Materials", body = Vec<Material>),
        (status = 401, description = "Not authenticated", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_materials(
    State(state): State<MaterialsState>,
    _auth: Authenticated,
    Query(query): Query<MaterialListQuery>,
) -> Result<Json<Vec<Material>>, PlatformError> {
    Ok(Json(state.workflow.list(query.os_id.as_deref()).await?))
}

/// Change a material's status
#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    tag = "materials",
    params(("id" = String, Path, description = "Material id")),
    request_body = MaterialStatusRequest,
    responses(
        (status = 200, description = "Material updated", body = Material),
        (status = 400, description = "Unknown status", body = crate::api::common::ApiError),
        (status = 404, description = "Material not found", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_material_status(
    State(state): State<MaterialsState>,
    auth: Authenticated,
    Path(id): Path<String>,
    AppJson(req): AppJson<MaterialStatusRequest>,
) -> Result<Json<Material>, PlatformError> {
    let material = state.workflow.update_status(&id, req.status, &auth.0).await?;
    Ok(Json(material))
}

pub fn materials_router(state: MaterialsState) -> Router {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route("/:id", put(update_material_status))
        .with_state(state)
}
