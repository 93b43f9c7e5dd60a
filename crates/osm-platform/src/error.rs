//! Platform Error Types

use axum::extract::rejection::JsonRejection;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::api::common::ApiError;

/// Message used for every login failure, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Username already registered: {username}")]
    DuplicateUsername { username: String },

    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PlatformError {
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername { username: username.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken { message: message.into() }
    }

    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable { message: message.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Stable code carried in the `error` field of the response body.
    pub fn error_code(&self) -> &'static str {
        match self {
            PlatformError::DuplicateUsername { .. } => "DUPLICATE_USERNAME",
            PlatformError::InvalidCredentials => "INVALID_CREDENTIALS",
            PlatformError::Unauthorized { .. } | PlatformError::InvalidToken { .. } => "UNAUTHORIZED",
            PlatformError::NotFound { .. } => "NOT_FOUND",
            PlatformError::Validation { .. } => "VALIDATION_ERROR",
            PlatformError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            PlatformError::Configuration { .. } | PlatformError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PlatformError::DuplicateUsername { .. } | PlatformError::Validation { .. } => StatusCode::BAD_REQUEST,
            PlatformError::InvalidCredentials
            | PlatformError::Unauthorized { .. }
            | PlatformError::InvalidToken { .. } => StatusCode::UNAUTHORIZED,
            PlatformError::NotFound { .. } => StatusCode::NOT_FOUND,
            PlatformError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            PlatformError::Configuration { .. } | PlatformError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<mongodb::error::Error> for PlatformError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::store_unavailable(err.to_string())
    }
}

impl From<bson::ser::Error> for PlatformError {
    fn from(err: bson::ser::Error) -> Self {
        Self::store_unavailable(format!("document encoding failed: {}", err))
    }
}

impl From<bson::de::Error> for PlatformError {
    fn from(err: bson::de::Error) -> Self {
        Self::store_unavailable(format!("document decoding failed: {}", err))
    }
}

impl From<JsonRejection> for PlatformError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match status {
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::INTERNAL_SERVER_ERROR => {
                error!(error = %self, "Request failed")
            }
            StatusCode::UNAUTHORIZED => debug!(error = %self, "Request rejected"),
            _ => warn!(error = %self, "Request rejected"),
        }

        // Token and store details stay in the logs.
        let message = match &self {
            PlatformError::InvalidToken { .. } => "Invalid or expired token".to_string(),
            PlatformError::StoreUnavailable { .. } => "Store unavailable".to_string(),
            PlatformError::Configuration { .. } | PlatformError::Internal { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ApiError {
            error: self.error_code().to_string(),
            message,
            details: None,
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(PlatformError::duplicate_username("a").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(PlatformError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PlatformError::invalid_token("x").status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(PlatformError::not_found("ServiceOrder", "1").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(PlatformError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            PlatformError::store_unavailable("down").status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            PlatformError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_token_reported_as_unauthorized() {
        assert_eq!(PlatformError::invalid_token("bad").error_code(), "UNAUTHORIZED");
    }

    #[test]
    fn test_invalid_credentials_message_is_constant() {
        assert_eq!(PlatformError::InvalidCredentials.to_string(), "Invalid credentials");
    }

    #[test]
    fn test_unauthorized_response_carries_challenge() {
        let response = PlatformError::unauthorized("missing token").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()),
            Some("Bearer")
        );
    }
}
