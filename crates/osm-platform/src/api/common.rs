//! Common API types and utilities

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PlatformError;

/// Standard API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// JSON body extractor whose rejections use the `ApiError` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(PlatformError))]
pub struct AppJson<T>(pub T);
