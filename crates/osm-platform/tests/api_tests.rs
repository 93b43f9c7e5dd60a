//! API Endpoint Tests
//!
//! Drives the full router against the in-memory store:
//! - Registration, login and the session guard
//! - Service order and material workflows
//! - Dashboard aggregation
//! - Health endpoints

use std::sync::Arc;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use osm_common::Env;
use osm_platform::api;
use osm_platform::error::PlatformError;
use osm_platform::repository::{Store, StoreHealth, UserRepository};
use osm_platform::service::{PlatformServices, TokenService};
use osm_platform::{PlatformConfig, User};

const SECRET: &str = "integration-test-secret";

/// Store probe that always fails
struct UnreachableStore;

#[async_trait]
impl StoreHealth for UnreachableStore {
    async fn ping(&self) -> osm_platform::error::Result<()> {
        Err(PlatformError::store_unavailable("connection refused"))
    }
}

fn test_config() -> PlatformConfig {
    PlatformConfig::from_source(&Env::from_lookup(|key: &str| match key {
        "OSM_JWT_SECRET" => Some(SECRET.to_string()),
        "OSM_STORE" => Some("memory".to_string()),
        _ => None,
    }))
    .unwrap()
}

fn create_test_app_with(store: Store) -> Router {
    let services = PlatformServices::new(&store, &test_config());
    api::router(&services, &store)
}

fn create_test_app() -> Router {
    create_test_app_with(Store::in_memory())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn register(app: &Router, username: &str, user_type: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "123456",
            "user_type": user_type,
            "full_name": format!("{} da Silva", username),
        })),
    )
    .await
}

async fn login_as(app: &Router, username: &str) -> String {
    let (status, _) = register(app, username, "tecnico").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": username, "password": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["access_token"].as_str().unwrap().to_string()
}

fn order_body(responsavel: &str) -> Value {
    json!({
        "descricao": "Motor do elevador com ruído",
        "tipo_servico": "Corretiva",
        "responsavel": responsavel,
        "prioridade": "Alta",
        "local": "Torre B",
        "equipamento": "Elevador 2",
    })
}

// ============================================================================
// Health Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_test_app();

    for uri in ["/health", "/health/live"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");
        assert!(body["version"].is_string());
    }

    let (status, body) = send(&app, Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "READY");
}

#[tokio::test]
async fn test_readiness_fails_when_store_unreachable() {
    let mut store = Store::in_memory();
    store.health = Arc::new(UnreachableStore);
    let app = create_test_app_with(store);

    let (status, body) = send(&app, Method::GET, "/health/ready", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "DOWN");

    let (status, _) = send(&app, Method::GET, "/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_api_banner() {
    let (status, body) = send(&create_test_app(), Method::GET, "/api", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

// ============================================================================
// Registration & Login Tests
// ============================================================================

#[tokio::test]
async fn test_register_returns_user_id() {
    let app = create_test_app();
    let (status, body) = register(&app, "maria", "admin").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User created successfully");
    assert!(body["user_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = create_test_app();
    let (status, _) = register(&app, "maria", "admin").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = register(&app, "maria", "tecnico").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "DUPLICATE_USERNAME");

    // The first account still logs in with its role intact
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "maria", "password": "123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["user_type"], "admin");
}

#[tokio::test]
async fn test_register_accepts_role_alias() {
    let app = create_test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "username": "joao",
            "email": "joao@example.com",
            "password": "123456",
            "role": "technician",
            "full_name": "João Lima",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validation() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        None,
        Some(json!({
            "username": "  ",
            "email": "x@example.com",
            "password": "123456",
            "user_type": "admin",
            "full_name": "X",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_response_shape() {
    let app = create_test_app();
    register(&app, "ana", "tecnico").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "ana", "password": "123456" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].is_string());
    assert_eq!(body["user"]["username"], "ana");
    assert_eq!(body["user"]["user_type"], "tecnico");
    assert_eq!(body["user"]["role"], "tecnico");
    assert!(body["user"]["id"].is_string());
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = create_test_app();
    register(&app, "ana", "tecnico").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "ana", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "ghost", "password": "123456" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
    assert_eq!(wrong_body["error"], "INVALID_CREDENTIALS");
    assert_eq!(wrong_body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_me_returns_public_view() {
    let app = create_test_app();
    let token = login_as(&app, "carla").await;

    let (status, body) = send(&app, Method::GET, "/api/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "carla");
    assert_eq!(body["full_name"], "carla da Silva");
    assert_eq!(body["user_type"], "tecnico");
    assert_eq!(body["role"], "tecnico");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_seeded_bcrypt_admin_can_log_in() {
    let store = Store::in_memory();
    let admin: User = bson::from_document(bson::doc! {
        "id": "default-admin-user",
        "username": "admin",
        "email": "admin@osmanager.com",
        "password_hash": "$2b$10$LQv3c1yqBWVHxkd0LHAkCOv2yGXdHsjzvLsa0A9whrlU8nd2ZTxDK",
        "user_type": "admin",
        "full_name": "Administrador do Sistema",
        "created_at": bson::DateTime::now(),
    })
    .unwrap();
    store.users.insert(&admin).await.unwrap();
    let app = create_test_app_with(store);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "username": "admin", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], "default-admin-user");
    assert_eq!(body["user"]["role"], "admin");

    let token = body["access_token"].as_str().unwrap();
    let (status, me) = send(&app, Method::GET, "/api/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user_type"], "admin");
}

// ============================================================================
// Session Guard Tests
// ============================================================================

#[tokio::test]
async fn test_missing_header_rejected_without_mutation() {
    let app = create_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/service-orders")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(order_body("João").to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    let token = login_as(&app, "auditor").await;
    let (_, orders) = send(&app, Method::GET, "/api/service-orders", Some(&token), None).await;
    assert_eq!(orders.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_tokens_rejected() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/api/dashboard", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let foreign = TokenService::new("some-other-secret", Duration::minutes(30))
        .issue_default("maria")
        .unwrap();
    let (status, _) = send(&app, Method::GET, "/api/dashboard", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/dashboard")
        .header(header::AUTHORIZATION, "Basic bWFyaWE6MTIzNDU2")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_user_rejected() {
    let app = create_test_app();
    let token = TokenService::new(SECRET, Duration::minutes(30))
        .issue_default("never-registered")
        .unwrap();

    let (status, _) = send(&app, Method::GET, "/api/service-orders", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let app = create_test_app();
    login_as(&app, "maria").await;
    let expired = TokenService::new(SECRET, Duration::minutes(30))
        .issue("maria", Duration::minutes(-5))
        .unwrap();

    let (status, _) = send(&app, Method::GET, "/api/me", Some(&expired), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Service Order Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_service_order() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/service-orders",
        Some(&token),
        Some(order_body("João")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["status"], "Aberta");
    assert_eq!(created["created_by"], "maria");

    let numero_os = created["numero_os"].as_str().unwrap();
    assert_eq!(numero_os.len(), 16);
    assert!(numero_os.starts_with("OS"));
    assert!(numero_os[2..10].chars().all(|c| c.is_ascii_digit()));
    assert!(numero_os[10..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/api/service-orders/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_service_order() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;

    let (status, body) = send(&app, Method::GET, "/api/service-orders/missing", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_status_only() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;
    let (_, created) = send(&app, Method::POST, "/api/service-orders", Some(&token), Some(order_body("João"))).await;
    let uri = format!("/api/service-orders/{}", created["id"].as_str().unwrap());
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "status": "Concluída", "descricao": null })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Concluída");
    for field in ["descricao", "tipo_servico", "responsavel", "prioridade", "local", "equipamento", "numero_os", "created_by"] {
        assert_eq!(updated[field], created[field], "{} changed", field);
    }

    let timestamp = |body: &Value| body["updated_at"].as_str().unwrap().parse::<DateTime<Utc>>().unwrap();
    assert!(timestamp(&updated) > timestamp(&created));
}

#[tokio::test]
async fn test_update_accepts_unaccented_status() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;
    let (_, created) = send(&app, Method::POST, "/api/service-orders", Some(&token), Some(order_body("João"))).await;
    let uri = format!("/api/service-orders/{}", created["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "status": "Em_Andamento" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Em Andamento");
}

#[tokio::test]
async fn test_update_unknown_service_order() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/service-orders/missing",
        Some(&token),
        Some(json!({ "status": "Pausada" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_status_rejected() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;
    let (_, created) = send(&app, Method::POST, "/api/service-orders", Some(&token), Some(order_body("João"))).await;
    let uri = format!("/api/service-orders/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::PUT, &uri, Some(&token), Some(json!({ "status": "Arquivada" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/service-orders")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"descricao\": "))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Material Tests
// ============================================================================

#[tokio::test]
async fn test_material_approval_flow() {
    let app = create_test_app();
    let tecnico = login_as(&app, "tecnico1").await;
    let admin = login_as(&app, "admin1").await;
    let supervisor = login_as(&app, "supervisor").await;

    let (status, material) = send(
        &app,
        Method::POST,
        "/api/materials",
        Some(&tecnico),
        Some(json!({ "os_id": "os-123", "descricao": "Cabo de aço 8mm", "quantidade": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(material["status"], "Solicitado");
    assert_eq!(material["solicitado_por"], "tecnico1");
    assert_eq!(material["aprovado_por"], Value::Null);

    let uri = format!("/api/materials/{}", material["id"].as_str().unwrap());

    // A client-supplied approver is ignored
    let (status, approved) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&admin),
        Some(json!({ "status": "Aprovado", "aprovado_por": "someone-else" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["status"], "Aprovado");
    assert_eq!(approved["aprovado_por"], "admin1");
    assert!(approved["data_aprovacao"].is_string());

    let (_, reapproved) = send(&app, Method::PUT, &uri, Some(&supervisor), Some(json!({ "status": "Aprovado" }))).await;
    assert_eq!(reapproved["aprovado_por"], "supervisor");

    let (_, delivered) = send(&app, Method::PUT, &uri, Some(&tecnico), Some(json!({ "status": "Entregue" }))).await;
    assert_eq!(delivered["status"], "Entregue");
    assert_eq!(delivered["aprovado_por"], "supervisor");
}

#[tokio::test]
async fn test_zero_quantity_rejected_and_not_persisted() {
    let app = create_test_app();
    let token = login_as(&app, "tecnico1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/materials",
        Some(&token),
        Some(json!({ "os_id": "os-1", "descricao": "Parafuso", "quantidade": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (_, materials) = send(&app, Method::GET, "/api/materials", Some(&token), None).await;
    assert_eq!(materials.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_materials_by_order() {
    let app = create_test_app();
    let token = login_as(&app, "tecnico1").await;

    for os_id in ["os-1", "os-1", "os-2"] {
        send(
            &app,
            Method::POST,
            "/api/materials",
            Some(&token),
            Some(json!({ "os_id": os_id, "descricao": "Fusível", "quantidade": 1 })),
        )
        .await;
    }

    let (_, filtered) = send(&app, Method::GET, "/api/materials?os_id=os-1", Some(&token), None).await;
    assert_eq!(filtered.as_array().unwrap().len(), 2);

    let (_, empty_filter) = send(&app, Method::GET, "/api/materials?os_id=", Some(&token), None).await;
    assert_eq!(empty_filter.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_unknown_material() {
    let app = create_test_app();
    let token = login_as(&app, "admin1").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/materials/missing",
        Some(&token),
        Some(json!({ "status": "Aprovado" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Dashboard Tests
// ============================================================================

#[tokio::test]
async fn test_dashboard_summary() {
    let app = create_test_app();
    let token = login_as(&app, "maria").await;

    let mut ids = Vec::new();
    for responsavel in ["João", "João", "Ana"] {
        let (_, order) = send(&app, Method::POST, "/api/service-orders", Some(&token), Some(order_body(responsavel))).await;
        ids.push(order["id"].as_str().unwrap().to_string());
    }
    send(
        &app,
        Method::PUT,
        &format!("/api/service-orders/{}", ids[2]),
        Some(&token),
        Some(json!({ "status": "Concluída", "prioridade": "Crítica" })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/materials",
        Some(&token),
        Some(json!({ "os_id": ids[0], "descricao": "Óleo", "quantidade": 2 })),
    )
    .await;

    let (status, summary) = send(&app, Method::GET, "/api/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_os"], 3);
    assert_eq!(summary["total_materials"], 1);
    assert_eq!(summary["os_by_status"], json!({ "Aberta": 2, "Concluída": 1 }));
    assert_eq!(summary["os_by_technician"], json!({ "João": 2, "Ana": 1 }));
    assert_eq!(summary["os_by_priority"], json!({ "Alta": 2, "Crítica": 1 }));
}
