//! Credential Service
//!
//! Registration and login. Plaintext passwords are hashed on the way in and
//! never stored or logged.

use std::sync::Arc;
use tracing::{info, warn};

use super::{PasswordService, TokenService};
use crate::domain::{Credentials, PublicUserView, Registration, User};
use crate::error::{PlatformError, Result};
use crate::repository::UserRepository;

/// Successful login
#[derive(Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub user: PublicUserView,
}

impl std::fmt::Debug for LoginOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginOutcome")
            .field("access_token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

pub struct CredentialService {
    users: Arc<dyn UserRepository>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: PasswordService, tokens: Arc<TokenService>) -> Self {
        Self { users, passwords, tokens }
    }

    /// Create a user and return its id.
    pub async fn register(&self, registration: Registration) -> Result<String> {
        registration.validate()?;

        if self.users.exists_by_username(&registration.username).await? {
            return Err(PlatformError::duplicate_username(&registration.username));
        }

        let password_hash = self.passwords.hash_password(&registration.password)?;
        let user = User::new(
            registration.username,
            registration.email,
            password_hash,
            registration.role,
            registration.full_name,
        );

        // The unique index still catches a concurrent registration of the same name.
        self.users.insert(&user).await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user.id)
    }

    /// Unknown user, wrong password and a corrupt stored hash all fail the same way.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        let user = match self.users.find_by_username(&credentials.username).await? {
            Some(user) => user,
            None => {
                warn!(username = %credentials.username, "Login failed");
                return Err(PlatformError::InvalidCredentials);
            }
        };

        match self.passwords.verify_password(&user.password_hash, &credentials.password) {
            Ok(true) => {}
            Ok(false) => {
                warn!(username = %credentials.username, "Login failed");
                return Err(PlatformError::InvalidCredentials);
            }
            Err(e) => {
                warn!(username = %credentials.username, error = %e, "Login failed on unreadable password hash");
                return Err(PlatformError::InvalidCredentials);
            }
        }

        let access_token = self.tokens.issue_default(&user.username)?;
        info!(username = %user.username, "User logged in");

        Ok(LoginOutcome {
            access_token,
            user: user.public_view(),
        })
    }
}
