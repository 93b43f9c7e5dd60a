//! Password Service
//!
//! Argon2id hashing with a random salt per password. Stored bcrypt hashes
//! (`$2a$`, `$2b$`, `$2y$`) from existing user records still verify.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::error;

use crate::error::{PlatformError, Result};

#[derive(Clone, Default)]
pub struct PasswordService {
    hasher: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a PHC-format hash string.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                error!(error = %e, "Password hashing failed");
                PlatformError::internal(format!("password hashing failed: {}", e))
            })
    }

    /// `Ok(false)` on mismatch; `Err` when the stored hash cannot be parsed.
    pub fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool> {
        if is_bcrypt_hash(password_hash) {
            return bcrypt::verify(password, password_hash)
                .map_err(|e| PlatformError::internal(format!("invalid stored password hash: {}", e)));
        }

        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| PlatformError::internal(format!("invalid stored password hash: {}", e)))?;

        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PlatformError::internal(format!("password verification failed: {}", e))),
        }
    }
}

fn is_bcrypt_hash(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"].iter().any(|prefix| hash.starts_with(prefix))
}
