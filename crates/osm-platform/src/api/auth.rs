//! Auth API Endpoints
//!
//! - POST /api/register - Create a user
//! - POST /api/login - Password login, returns a bearer token
//! - GET /api/me - Current user

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::api::common::{AppJson, MessageResponse};
use crate::api::middleware::Authenticated;
use crate::domain::{Credentials, PublicUserView, Registration};
use crate::error::PlatformError;
use crate::service::CredentialService;

/// Registration response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,

    /// Always "bearer"
    pub token_type: String,

    pub user: PublicUserView,
}

#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<CredentialService>,
}

/// API banner
#[utoipa::path(
    get,
    path = "/api",
    tag = "auth",
    responses((status = 200, description = "API is up", body = MessageResponse))
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("OS Manager API"))
}

/// Register a user
#[utoipa::path(
    post,
    path = "/api/register",
    tag = "auth",
    request_body = Registration,
    responses(
        (status = 200, description = "User created", body = RegisterResponse),
        (status = 400, description = "Username taken or invalid input", body = crate::api::common::ApiError)
    )
)]
pub async fn register(
    State(state): State<AuthState>,
    AppJson(req): AppJson<Registration>,
) -> Result<Json<RegisterResponse>, PlatformError> {
    let user_id = state.credentials.register(req).await?;

    Ok(Json(RegisterResponse {
        message: "User created successfully".to_string(),
        user_id,
    }))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/login",
    tag = "auth",
    request_body = Credentials,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::common::ApiError)
    )
)]
pub async fn login(
    State(state): State<AuthState>,
    AppJson(req): AppJson<Credentials>,
) -> Result<Json<LoginResponse>, PlatformError> {
    let outcome = state.credentials.login(&req).await?;

    Ok(Json(LoginResponse {
        access_token: outcome.access_token,
        token_type: "bearer".to_string(),
        user: outcome.user,
    }))
}

/// Get the current user
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = PublicUserView),
        (status = 401, description = "Not authenticated", body = crate::api::common::ApiError)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(auth: Authenticated) -> Json<PublicUserView> {
    Json(auth.0.public_view())
}

pub fn auth_router(state: AuthState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_current_user))
        .with_state(state)
}
