//! Session Guard

use std::sync::Arc;
use tracing::debug;

use super::TokenService;
use crate::domain::User;
use crate::error::{PlatformError, Result};
use crate::repository::UserRepository;

/// Resolves a bearer token to the user it was issued for.
pub struct SessionGuard {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserRepository>,
}

impl SessionGuard {
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Fails with `Unauthorized` for a bad token or a user that no longer
    /// exists. Store failures propagate unchanged.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let username = self.tokens.verify(token).map_err(|e| {
            debug!(error = %e, "Token rejected");
            PlatformError::unauthorized("Invalid or expired token")
        })?;

        self.users
            .find_by_username(&username)
            .await?
            .ok_or_else(|| PlatformError::unauthorized("User not found"))
    }
}
