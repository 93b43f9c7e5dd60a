//! API Middleware
//!
//! Bearer-token authentication for Axum handlers.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use crate::domain::User;
use crate::error::PlatformError;
use crate::service::{extract_bearer_token, SessionGuard};

/// Shared state the extractor reads from request extensions
#[derive(Clone)]
pub struct AppState {
    pub session_guard: Arc<SessionGuard>,
}

/// Extractor for authenticated requests.
/// Rejects with 401 before the handler body runs.
pub struct Authenticated(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = PlatformError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| PlatformError::unauthorized("Missing Authorization header"))?;

        let token = extract_bearer_token(auth_header)
            .ok_or_else(|| PlatformError::unauthorized("Invalid Authorization header format"))?
            .to_string();

        let guard = parts
            .extensions
            .get::<AppState>()
            .map(|state| state.session_guard.clone())
            .ok_or_else(|| PlatformError::internal("AppState not found in request extensions"))?;

        let user = guard.authenticate(&token).await?;
        Ok(Authenticated(user))
    }
}
