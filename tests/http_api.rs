//! HTTP API Tests
//!
//! Drives the full router (health, listings, detail routes and guarded
//! routes) with in-memory requests:
//! - Errors use the `{success: false, error}` shape
//! - Missing or bad credentials and refused roles are 401, with distinct messages
//! - Course deletion is limited to the owner or an admin

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use devcamp::auth::{TokenConfig, TokenManager};
use devcamp::http_server::{AppState, HttpServer, HttpServerConfig};
use devcamp::query::PaginationConfig;
use devcamp::store::{DocumentStore, InMemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "http-api-test-secret";

// =============================================================================
// Helper Functions
// =============================================================================

fn tokens() -> TokenManager {
    TokenManager::new(TokenConfig::new(SECRET, Duration::days(30)))
}

async fn app() -> Router {
    let store = Arc::new(InMemoryStore::new());

    for doc in [
        json!({"id": "u_admin", "name": "Admin Account", "role": "admin"}),
        json!({"id": "u_pub", "name": "Publisher Account", "role": "publisher"}),
        json!({"id": "u_pub2", "name": "Other Publisher", "role": "publisher"}),
        json!({"id": "u_user", "name": "User Account", "role": "user"}),
    ] {
        store.insert("users", doc).await.unwrap();
    }

    for doc in [
        json!({"id": "b1", "name": "Devworks Bootcamp", "description": "Full stack", "averageCost": 10000,
               "user": "u_pub", "createdAt": "2024-01-01T00:00:00.000Z"}),
        json!({"id": "b2", "name": "ModernTech Bootcamp", "description": "Mobile", "averageCost": 12000,
               "user": "u_pub2", "createdAt": "2024-01-02T00:00:00.000Z"}),
    ] {
        store.insert("bootcamps", doc).await.unwrap();
    }

    for doc in [
        json!({"id": "c1", "title": "Front End", "tuition": 8000, "bootcamp": "b1", "user": "u_pub",
               "createdAt": "2024-02-01T00:00:00.000Z"}),
        json!({"id": "c2", "title": "Mobile", "tuition": 12000, "bootcamp": "b2", "user": "u_pub2",
               "createdAt": "2024-02-02T00:00:00.000Z"}),
    ] {
        store.insert("courses", doc).await.unwrap();
    }

    store
        .insert("reviews", json!({"id": "r1", "title": "Great", "rating": 9, "bootcamp": "b1", "user": "u_user"}))
        .await
        .unwrap();

    let state = AppState::new(store, PaginationConfig::default(), tokens());
    HttpServer::build_router(&HttpServerConfig::default(), state)
}

async fn send(app: &Router, method: Method, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        let token = tokens().issue(user).unwrap();
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &Router, uri: &str, user: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, user).await
}

fn assert_error(body: &Value) {
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
}

// =============================================================================
// Public Routes
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_list_bootcamps_envelope() {
    let app = app().await;
    let (status, body) = get(&app, "/api/v1/bootcamps?averageCost%5Blte%5D=10000&select=name", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "count": 1,
            "pagination": {},
            "results": [{"id": "b1", "name": "Devworks Bootcamp"}]
        })
    );
}

#[tokio::test]
async fn test_list_with_pagination_links() {
    let app = app().await;
    let (status, body) = get(&app, "/api/v1/bootcamps?limit=1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["id"], "b2");
    assert_eq!(body["pagination"], json!({"next": {"page": 2, "limit": 1}}));
}

#[tokio::test]
async fn test_bad_filter_is_400() {
    let app = app().await;
    let (status, body) = get(&app, "/api/v1/bootcamps?averageCost%5Bne%5D=1", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body);
}

#[tokio::test]
async fn test_single_bootcamp() {
    let app = app().await;

    let (status, body) = get(&app, "/api/v1/bootcamps/b1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Devworks Bootcamp");

    let (status, body) = get(&app, "/api/v1/bootcamps/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body);
}

#[tokio::test]
async fn test_bootcamp_courses() {
    let app = app().await;
    let (status, body) = get(&app, "/api/v1/bootcamps/b1/courses", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["id"], "c1");
}

#[tokio::test]
async fn test_courses_and_reviews_expand_bootcamp() {
    let app = app().await;
    let expected = json!({"id": "b1", "name": "Devworks Bootcamp", "description": "Full stack"});

    let (status, body) = get(&app, "/api/v1/courses?tuition%5Blt%5D=10000", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["bootcamp"], expected);

    let (status, body) = get(&app, "/api/v1/courses/c1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bootcamp"], expected);

    let (status, body) = get(&app, "/api/v1/reviews", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"][0]["bootcamp"], expected);

    let (status, body) = get(&app, "/api/v1/reviews/r1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bootcamp"], expected);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_me_requires_credentials() {
    let app = app().await;

    let (status, body) = get(&app, "/api/v1/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body);

    let (status, body) = get(&app, "/api/v1/auth/me", Some("u_user")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "u_user");
}

#[tokio::test]
async fn test_unknown_subject_is_401() {
    let app = app().await;
    let (status, body) = get(&app, "/api/v1/auth/me", Some("ghost")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body);
}

#[tokio::test]
async fn test_foreign_token_is_401() {
    let app = app().await;
    let foreign = TokenManager::new(TokenConfig::new("other", Duration::days(1)))
        .issue("u_admin")
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/users")
                .header(header::AUTHORIZATION, format!("Bearer {foreign}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Authorization
// =============================================================================

#[tokio::test]
async fn test_users_admin_only() {
    let app = app().await;

    let (status, _) = get(&app, "/api/v1/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = get(&app, "/api/v1/users", Some("u_user")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User role user is not authorized to access this route");

    let (status, body) = get(&app, "/api/v1/users", Some("u_admin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 4);

    let (status, body) = get(&app, "/api/v1/users/u_pub", Some("u_admin")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "publisher");
}

#[tokio::test]
async fn test_delete_course_ownership() {
    let app = app().await;

    let (status, _) = send(&app, Method::DELETE, "/api/v1/courses/c1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::DELETE, "/api/v1/courses/c1", Some("u_user")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User role user is not authorized to access this route");

    let (status, body) = send(&app, Method::DELETE, "/api/v1/courses/c1", Some("u_pub2")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User u_pub2 is not authorized to delete course c1");

    let (status, body) = send(&app, Method::DELETE, "/api/v1/courses/c1", Some("u_pub")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": {}}));

    let (status, _) = get(&app, "/api/v1/courses/c1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Guards sit on the method, so unsupported methods on guarded paths are 405.
#[tokio::test]
async fn test_unsupported_method_on_guarded_path() {
    let app = app().await;

    let (status, _) = send(&app, Method::POST, "/api/v1/courses/c1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, _) = send(&app, Method::DELETE, "/api/v1/users/u_pub", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = get(&app, "/api/v1/courses/c1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], "c1");
}

#[tokio::test]
async fn test_admin_deletes_any_course() {
    let app = app().await;

    let (status, _) = send(&app, Method::DELETE, "/api/v1/courses/c2", Some("u_admin")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/api/v1/courses/c2", Some("u_admin")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body);
}
