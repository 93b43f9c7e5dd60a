//! OpenAPI Documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OS Manager API OpenAPI Documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "OS Manager API",
        version = "1.0.0",
        description = "Service orders, material requisitions and the operations dashboard"
    ),
    servers(
        (url = "http://localhost:8001", description = "Local development")
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "service-orders", description = "Service order lifecycle"),
        (name = "materials", description = "Material requisitions"),
        (name = "dashboard", description = "Aggregated counts"),
        (name = "monitoring", description = "Health checks")
    ),
    paths(
        super::auth::root,
        super::auth::register,
        super::auth::login,
        super::auth::get_current_user,
        super::service_orders::create_service_order,
        super::service_orders::list_service_orders,
        super::service_orders::get_service_order,
        super::service_orders::update_service_order,
        super::materials::create_material,
        super::materials::list_materials,
        super::materials::update_material_status,
        super::dashboard::get_dashboard,
        super::health::live,
        super::health::ready,
    ),
    components(
        schemas(
            super::common::ApiError,
            super::common::MessageResponse,
            super::auth::RegisterResponse,
            super::auth::LoginResponse,
            super::materials::MaterialStatusRequest,
            super::health::HealthResponse,
            crate::domain::UserRole,
            crate::domain::PublicUserView,
            crate::domain::Registration,
            crate::domain::Credentials,
            crate::domain::ServiceOrder,
            crate::domain::ServiceOrderStatus,
            crate::domain::Priority,
            crate::domain::NewServiceOrder,
            crate::domain::ServiceOrderPatch,
            crate::domain::Material,
            crate::domain::MaterialStatus,
            crate::domain::NewMaterial,
            crate::domain::DashboardSummary,
        )
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
