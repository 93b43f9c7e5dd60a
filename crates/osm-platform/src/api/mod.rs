//! API Layer
//!
//! Axum routers for the `/api` surface plus health endpoints.

pub mod common;
pub mod middleware;

pub mod auth;
pub mod service_orders;
pub mod materials;
pub mod dashboard;
pub mod health;
pub mod openapi;

pub use common::{ApiError, AppJson, MessageResponse};
pub use middleware::{AppState, Authenticated};

pub use auth::{AuthState, auth_router};
pub use service_orders::{ServiceOrdersState, service_orders_router};
pub use materials::{MaterialsState, materials_router};
pub use dashboard::{DashboardState, dashboard_router};
pub use health::{HealthState, health_router};
pub use openapi::ApiDoc;

use axum::{Extension, Router};

use crate::repository::Store;
use crate::service::PlatformServices;

/// The full application router: `/api/*` and `/health*`.
pub fn router(services: &PlatformServices, store: &Store) -> Router {
    let app_state = AppState {
        session_guard: services.session_guard.clone(),
    };

    let api = Router::new()
        .merge(auth_router(AuthState {
            credentials: services.credentials.clone(),
        }))
        .merge(dashboard_router(DashboardState {
            reporter: services.reporter.clone(),
        }))
        .nest("/service-orders", service_orders_router(ServiceOrdersState {
            workflow: services.service_orders.clone(),
        }))
        .nest("/materials", materials_router(MaterialsState {
            workflow: services.materials.clone(),
        }));

    Router::new()
        .nest("/api", api)
        .merge(health_router(HealthState {
            store: store.health.clone(),
        }))
        .layer(Extension(app_state))
}
