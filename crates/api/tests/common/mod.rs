//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use cookiejar_api::auth::jwt::{generate_access_token, JwtConfig};
use cookiejar_api::config::ServerConfig;
use cookiejar_api::router::build_app_router;
use cookiejar_api::state::AppState;
use cookiejar_core::types::DbId;
use cookiejar_db::models::user::CreateUser;
use cookiejar_db::repositories::UserRepo;
use cookiejar_storage::{LocalStorage, StorageConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const PUBLIC_BASE_URL: &str = "http://localhost:3000/uploads";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(storage_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: jwt_config(),
        storage: StorageConfig::local(storage_root, PUBLIC_BASE_URL),
    }
}

/// Build the full application router over local storage rooted at
/// `storage_root`.
pub fn build_test_app_with_storage(pool: PgPool, storage_root: &Path) -> Router {
    let config = test_config(storage_root);
    let storage = Arc::new(LocalStorage::new(
        storage_root.to_path_buf(),
        PUBLIC_BASE_URL.to_string(),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage,
    };
    build_app_router(state, &config)
}

/// Build the full application router. Storage points at a directory that is
/// never written to.
pub fn build_test_app(pool: PgPool) -> Router {
    let root: PathBuf = std::env::temp_dir().join("cookiejar-test-uploads-unused");
    build_test_app_with_storage(pool, &root)
}

/// A bearer token the test app accepts for `user_id`.
pub fn token_for(user_id: DbId) -> String {
    generate_access_token(user_id, &jwt_config()).unwrap()
}

pub async fn create_user(pool: &PgPool, username: &str) -> DbId {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `check` until it returns true, for effects dispatched in the
/// background.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}
