//! OS Manager Server
//!
//! Production server for the OS Manager REST APIs:
//! - Auth: register, login, current user
//! - Service orders and material requisitions
//! - Dashboard aggregation
//! - Health, readiness and OpenAPI documentation
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OSM_API_PORT` | `8001` | HTTP API port |
//! | `MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `DB_NAME` | `os_manager` | MongoDB database name |
//! | `OSM_JWT_SECRET` | - | HS256 signing secret (required unless dev mode) |
//! | `OSM_TOKEN_TTL_MINUTES` | `30` | Access token lifetime |
//! | `CORS_ORIGINS` | `*` | Comma-separated allowed origins |
//! | `OSM_STORE` | `mongo` | `mongo` or `memory` |
//! | `OSM_DEV_MODE` | `false` | Allows a generated secret |
//! | `OSM_LOG_FORMAT` | `text` | `text` or `json` |
//! | `RUST_LOG` | `info` | Log level |

use anyhow::Result;
use axum::http::HeaderValue;
use tokio::{net::TcpListener, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use osm_common::{init_logging, Env};
use osm_platform::api::{self, ApiDoc};
use osm_platform::repository::{ensure_indexes, Store};
use osm_platform::service::PlatformServices;
use osm_platform::{PlatformConfig, StoreKind};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(PlatformConfig::log_format_from(&Env::process())?);
    info!("Starting OS Manager Server");

    let config = PlatformConfig::from_env()?;

    let store = match config.store {
        StoreKind::Mongo => {
            info!("Connecting to MongoDB: {}/{}", config.mongo_url, config.db_name);
            let mongo_client = mongodb::Client::with_uri_str(&config.mongo_url).await?;
            let db = mongo_client.database(&config.db_name);
            ensure_indexes(&db).await?;
            Store::mongo(&db)
        }
        StoreKind::Memory => {
            warn!("Using the in-memory store; data is lost on shutdown");
            Store::in_memory()
        }
    };

    let services = PlatformServices::new(&store, &config);
    info!(token_ttl_minutes = services.tokens.default_ttl().num_minutes(), "Services initialized");

    let app = api::router(&services, &store)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let api_addr = format!("0.0.0.0:{}", config.api_port);
    let listener = TcpListener::bind(&api_addr).await?;
    info!("API server listening on http://{}", api_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("OS Manager Server shutdown complete");
    Ok(())
}

fn cors_layer(config: &PlatformConfig) -> Result<CorsLayer> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| HeaderValue::from_str(o))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
