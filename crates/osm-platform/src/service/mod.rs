//! Service Layer
//!
//! Credentials, tokens, the two workflows and the dashboard reporter.

pub mod token;
pub mod password;
pub mod credentials;
pub mod session;
pub mod service_orders;
pub mod materials;
pub mod reporter;

pub use token::{extract_bearer_token, AccessTokenClaims, TokenService, DEFAULT_TOKEN_TTL_MINUTES};
pub use password::PasswordService;
pub use credentials::{CredentialService, LoginOutcome};
pub use session::SessionGuard;
pub use service_orders::ServiceOrderWorkflow;
pub use materials::MaterialWorkflow;
pub use reporter::AggregationReporter;

use std::sync::Arc;

use crate::config::PlatformConfig;
use crate::repository::Store;

/// Every service the API needs, wired against one store.
#[derive(Clone)]
pub struct PlatformServices {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<CredentialService>,
    pub session_guard: Arc<SessionGuard>,
    pub service_orders: Arc<ServiceOrderWorkflow>,
    pub materials: Arc<MaterialWorkflow>,
    pub reporter: Arc<AggregationReporter>,
}

impl PlatformServices {
    pub fn new(store: &Store, config: &PlatformConfig) -> Self {
        let tokens = Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl));

        Self {
            credentials: Arc::new(CredentialService::new(
                store.users.clone(),
                PasswordService::new(),
                tokens.clone(),
            )),
            session_guard: Arc::new(SessionGuard::new(tokens.clone(), store.users.clone())),
            service_orders: Arc::new(ServiceOrderWorkflow::new(store.service_orders.clone())),
            materials: Arc::new(MaterialWorkflow::new(store.materials.clone())),
            reporter: Arc::new(AggregationReporter::new(
                store.service_orders.clone(),
                store.materials.clone(),
            )),
            tokens,
        }
    }
}
