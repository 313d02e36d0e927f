//! Integration tests for the HTTP surface.
//!
//! The real service container is wired to a disconnected database and an
//! in-memory cache, so only requests that never reach SQL are exercised.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;

use crud_starter::api::{create_router, AppState};
use crud_starter::config::Config;
use crud_starter::errors::{AppError, AppResult};
use crud_starter::infra::{Database, KeyValueCache};

// =============================================================================
// In-memory cache
// =============================================================================

#[derive(Default)]
struct MemoryCache {
    values: Mutex<HashMap<String, String>>,
    reachable: bool,
}

impl MemoryCache {
    fn reachable() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            reachable: true,
        }
    }

    fn with(self, key: &str, value: Value) -> Self {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: String, _ttl_seconds: u64) -> AppResult<()> {
        self.values.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(AppError::internal("connection refused"))
        }
    }

    async fn try_lock(&self, _resource: &str, _ttl_seconds: u64) -> AppResult<Option<String>> {
        Ok(Some("token".to_string()))
    }

    async fn unlock(&self, _resource: &str, _token: &str) -> AppResult<bool> {
        Ok(true)
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn test_config() -> Config {
    Config::from_lookup(|_| None)
}

fn app(cache: MemoryCache) -> Router {
    let database = Arc::new(Database::from_connection(DatabaseConnection::Disconnected));
    let cache: Arc<dyn KeyValueCache> = Arc::new(cache);
    create_router(AppState::from_config(database, cache, &test_config()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_root_returns_welcome_message() {
    let (status, body) = send(app(MemoryCache::reachable()), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Welcome to Rust CRUD Starter!" }));
}

#[tokio::test]
async fn test_openapi_lists_resources() {
    let (status, body) = send(app(MemoryCache::reachable()), get("/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["version"], "1.0.0");
    assert!(body["paths"]["/users"].is_object());
    assert!(body["paths"]["/relationships-demo/many-to-many"].is_object());
}

#[tokio::test]
async fn test_health_reports_each_dependency() {
    let unreachable = MemoryCache::default();
    let (status, body) = send(app(unreachable), get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["database"]["status"], "unhealthy");
    assert_eq!(body["services"]["redis"]["status"], "unhealthy");
}

#[tokio::test]
async fn test_user_served_from_cache() {
    let cached = json!({
        "id": 7,
        "email": "cached@example.com",
        "username": "cached",
        "is_active": true,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": null
    });
    let cache = MemoryCache::reachable().with("user:7", cached);

    let (status, body) = send(app(cache), get("/users/7")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "cached");
}

#[tokio::test]
async fn test_validation_rejected_before_persistence() {
    let cases = [
        (
            "/users",
            json!({ "email": "bad", "username": "alice", "password": "password123" }),
        ),
        (
            "/users",
            json!({ "email": "a@example.com", "username": "alice", "password": "short" }),
        ),
        ("/posts", json!({ "title": "", "content": "x", "user_id": 1 })),
        ("/categories", json!({ "name": "" })),
        ("/roles", json!({ "name": "" })),
    ];

    for (uri, payload) in cases {
        let (status, body) = send(app(MemoryCache::reachable()), post_json(uri, payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{}", uri);
    }
}

#[tokio::test]
async fn test_non_numeric_id_is_rejected() {
    let (status, _) = send(app(MemoryCache::reachable()), get("/posts/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, _) = send(app(MemoryCache::reachable()), get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
