//! Platform configuration
//!
//! Built once at startup from the environment and passed by reference to
//! whatever needs it.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Duration;
use osm_common::{Env, EnvError, LogFormat};
use rand::RngCore;
use std::str::FromStr;
use tracing::warn;

use crate::error::{PlatformError, Result};
use crate::service::DEFAULT_TOKEN_TTL_MINUTES;

/// Which repository implementation backs the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    Mongo,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreKind::Mongo),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store: {}", other)),
        }
    }
}

#[derive(Clone)]
pub struct PlatformConfig {
    pub api_port: u16,
    pub mongo_url: String,
    pub db_name: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// `*` or explicit origins
    pub cors_origins: Vec<String>,
    pub store: StoreKind,
    pub dev_mode: bool,
    pub log_format: LogFormat,
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("api_port", &self.api_port)
            .field("mongo_url", &self.mongo_url)
            .field("db_name", &self.db_name)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("cors_origins", &self.cors_origins)
            .field("store", &self.store)
            .field("dev_mode", &self.dev_mode)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl PlatformConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_source(&Env::process())
    }

    /// Logging is initialised before the rest of the config is read.
    pub fn log_format_from<F>(env: &Env<F>) -> Result<LogFormat>
    where
        F: Fn(&str) -> Option<String>,
    {
        env.or("OSM_LOG_FORMAT", "text")
            .parse()
            .map_err(PlatformError::configuration)
    }

    pub fn from_source<F>(env: &Env<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dev_mode = env.flag("OSM_DEV_MODE");

        let jwt_secret = match env.required("OSM_JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if dev_mode => {
                warn!("OSM_JWT_SECRET not set; generated an ephemeral secret for dev mode");
                generate_secret()
            }
            Err(e) => return Err(e.into()),
        };

        let ttl_minutes: i64 = env.parse_or("OSM_TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        if ttl_minutes <= 0 {
            return Err(PlatformError::configuration("OSM_TOKEN_TTL_MINUTES must be positive"));
        }

        let store: StoreKind = env
            .or("OSM_STORE", "mongo")
            .parse()
            .map_err(PlatformError::configuration)?;

        let log_format = Self::log_format_from(env)?;

        let cors_origins = env
            .or("CORS_ORIGINS", "*")
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            api_port: env.parse_or("OSM_API_PORT", 8001)?,
            mongo_url: env.or("MONGO_URL", "mongodb://localhost:27017"),
            db_name: env.or("DB_NAME", "os_manager"),
            jwt_secret,
            token_ttl: Duration::minutes(ttl_minutes),
            cors_origins,
            store,
            dev_mode,
            log_format,
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl From<EnvError> for PlatformError {
    fn from(err: EnvError) -> Self {
        PlatformError::configuration(err.to_string())
    }
}

fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
