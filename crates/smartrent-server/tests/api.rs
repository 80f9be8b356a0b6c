//! End-to-end tests driving the router in-process.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use smartrent::{Department, DepartmentRepository, MemoryStore, User, UserRepository, UserRole};
use smartrent_server::{build_router, AppState};
use tower::ServiceExt;

async fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    for user in [
        User::new("U1", "Ana", "ana@example.com", UserRole::User),
        User::new("U2", "Luis", "luis@example.com", UserRole::User),
        User::new("A1", "Admin", "admin@example.com", UserRole::Admin),
    ] {
        UserRepository::create(store.as_ref(), user).await.unwrap();
    }
    DepartmentRepository::create(store.as_ref(), Department::new("D1", "A-101", "Unit 101", ""))
        .await
        .unwrap();
    build_router(AppState::new(store))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((id, role)) = user {
        builder = builder.header("x-user-id", id).header("x-user-role", role);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

const TENANT: Option<(&str, &str)> = Some(("U1", "USER"));
const OTHER: Option<(&str, &str)> = Some(("U2", "USER"));
const ADMIN: Option<(&str, &str)> = Some(("A1", "ADMIN"));

fn faucet() -> Value {
    json!({
        "title": "Leaking faucet",
        "description": "Kitchen faucet drips constantly",
        "category": "MAINTENANCE",
        "priority": "MEDIA",
        "departmentId": "D1"
    })
}

async fn create(app: &Router) -> String {
    let (status, body) = call(app, Method::POST, "/api/alerts", TENANT, Some(faucet())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = app().await;
    let (status, body) = call(&app, Method::GET, "/api/alerts", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_alert_lifecycle_over_http() {
    let app = app().await;
    let id = create(&app).await;

    let (status, body) = call(&app, Method::GET, &format!("/api/alerts/{id}"), TENANT, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "PENDING");
    assert_eq!(body["data"]["priority"], "MEDIUM");

    let (status, _) = call(&app, Method::GET, &format!("/api/alerts/{id}"), OTHER, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/api/alerts/{id}/status");
    let (status, body) = call(
        &app,
        Method::PATCH,
        &uri,
        ADMIN,
        Some(json!({"status": "IN_PROGRESS"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["assignedTo"], "A1");

    let (status, body) = call(
        &app,
        Method::PATCH,
        &uri,
        ADMIN,
        Some(json!({"status": "RESOLVED", "notes": "Fixed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["resolvedAt"].is_string());

    let (status, body) = call(
        &app,
        Method::PATCH,
        &uri,
        ADMIN,
        Some(json!({"status": "PENDING"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_status_change_by_tenant_is_forbidden() {
    let app = app().await;
    let id = create(&app).await;
    let (status, body) = call(
        &app,
        Method::PATCH,
        &format!("/api/alerts/{id}/status"),
        TENANT,
        Some(json!({"status": "CANCELLED"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_invalid_body_is_bad_request() {
    let app = app().await;
    let mut body = faucet();
    body["category"] = json!("PLUMBING");
    let (status, body) = call(&app, Method::POST, "/api/alerts", TENANT, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_listing_and_pagination() {
    let app = app().await;
    for _ in 0..12 {
        create(&app).await;
    }

    let (status, body) = call(&app, Method::GET, "/api/alerts?limit=5&page=3", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["pagination"]["totalPages"], 3);
    assert_eq!(body["data"]["pagination"]["hasNext"], false);

    let (_, body) = call(&app, Method::GET, "/api/alerts", OTHER, None).await;
    assert_eq!(body["data"]["pagination"]["totalCount"], 0);

    let (status, _) = call(&app, Method::GET, "/api/alerts?limit=0", ADMIN, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_admin_only() {
    let app = app().await;
    create(&app).await;

    let (status, _) = call(&app, Method::GET, "/api/alerts/stats", TENANT, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/api/alerts/stats", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["byStatus"]["PENDING"], 1);
}

#[tokio::test]
async fn test_department_tenant_flow() {
    let app = app().await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/departments",
        ADMIN,
        Some(json!({"code": "b-202", "name": "Unit 202"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["code"], "B-202");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let tenant_uri = format!("/api/departments/{id}/tenant");
    let (status, _) = call(
        &app,
        Method::PUT,
        &tenant_uri,
        ADMIN,
        Some(json!({"tenantId": "U1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(
        &app,
        Method::DELETE,
        &format!("/api/departments/{id}"),
        ADMIN,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, Method::DELETE, &tenant_uri, ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].get("tenantId").is_none());

    let (_, body) = call(&app, Method::GET, "/api/departments", TENANT, None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
