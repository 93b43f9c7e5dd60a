//! User Entity
//!
//! Identity and credentials for an operator of the system. Users are created
//! once at registration and never modified afterwards.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

use super::timestamp::stored_timestamp;
use crate::error::{PlatformError, Result};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum UserRole {
    #[serde(rename = "admin", alias = "administrator")]
    Admin,
    #[serde(rename = "tecnico", alias = "technician")]
    Tecnico,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Tecnico => "tecnico",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted user record (collection `users`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Unique, case-sensitive login name
    pub username: String,

    pub email: String,

    /// Argon2 PHC string, or bcrypt for older records; never leaves the service layer
    pub password_hash: String,

    #[serde(rename = "user_type")]
    pub role: UserRole,

    pub full_name: String,

    #[serde(deserialize_with = "stored_timestamp")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            full_name: full_name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn public_view(&self) -> PublicUserView {
        PublicUserView {
            id: self.id.clone(),
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
        }
    }
}

/// The subset of a user that may be echoed to clients.
///
/// The role goes out under both `user_type` and `role`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct PublicUserView {
    pub id: String,
    pub username: String,
    pub full_name: String,
    #[serde(rename = "user_type")]
    pub role: UserRole,
}

impl Serialize for PublicUserView {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut view = serializer.serialize_struct("PublicUserView", 5)?;
        view.serialize_field("id", &self.id)?;
        view.serialize_field("username", &self.username)?;
        view.serialize_field("full_name", &self.full_name)?;
        view.serialize_field("user_type", &self.role)?;
        view.serialize_field("role", &self.role)?;
        view.end()
    }
}

/// Registration input
#[derive(Clone, Deserialize, ToSchema)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "user_type", alias = "role")]
    pub role: UserRole,
    pub full_name: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

impl Registration {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(PlatformError::validation("username must not be empty"));
        }
        if self.password.trim().is_empty() {
            return Err(PlatformError::validation("password must not be empty"));
        }
        if self.full_name.trim().is_empty() {
            return Err(PlatformError::validation("full_name must not be empty"));
        }
        if !self.email.contains('@') {
            return Err(PlatformError::validation("email must be a valid address"));
        }
        Ok(())
    }
}

/// Login input
#[derive(Clone, Deserialize, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
