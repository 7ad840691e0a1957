#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use showroom_api::auth::jwt::{generate_access_token, JwtConfig, ADMIN_ROLE};
use showroom_api::auth::password::hash_password;
use showroom_api::config::{ServerConfig, StorageBackend, StorageConfig};
use showroom_api::router::build_app_router;
use showroom_api::state::AppState;
use showroom_core::storage::{LocalObjectStore, ObjectStore};
use showroom_db::models::user::{CreateUser, User};
use showroom_db::repositories::UserRepo;

pub const TEST_PASSWORD: &str = "test_password_123!";

fn scratch_dir(kind: &str) -> PathBuf {
    std::env::temp_dir().join(format!("showroom-test-{kind}-{}", uuid::Uuid::new_v4().simple()))
}

/// Build a test `ServerConfig` with safe defaults and throwaway directories.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
        storage: StorageConfig {
            backend: StorageBackend::Local {
                root: scratch_dir("media"),
                base_url: "http://localhost:3000/media".to_string(),
            },
            staging_dir: scratch_dir("staging"),
        },
    }
}

/// Build the full application router backed by a local object store.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

/// Like [`build_test_app`], for tests that inspect the configured directories.
pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let store: Arc<dyn ObjectStore> = match &config.storage.backend {
        StorageBackend::Local { root, base_url } => {
            Arc::new(LocalObjectStore::new(root.clone(), base_url.clone()))
        }
        StorageBackend::S3 { .. } => unreachable!("tests use the local backend"),
    };
    build_test_app_with_store(pool, config, store)
}

/// Build the application router with a caller-supplied object store.
pub fn build_test_app_with_store(
    pool: PgPool,
    config: ServerConfig,
    store: Arc<dyn ObjectStore>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        store,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

pub async fn create_admin(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Create an admin and mint an access token for it.
pub async fn admin_with_token(pool: &PgPool, username: &str) -> (User, String) {
    let user = create_admin(pool, username).await;
    let token = generate_access_token(user.id, ADMIN_ROLE, &test_config().jwt).expect("token");
    (user, token)
}

pub async fn admin_token(pool: &PgPool, username: &str) -> String {
    admin_with_token(pool, username).await.1
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, builder(Method::GET, uri, None).body(Body::empty()).expect("request")).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::GET, uri, Some(token))
            .body(Body::empty())
            .expect("request"),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        builder(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .expect("request"),
    )
    .await
}

/// POST a `multipart/form-data` body of `(field, file_name, bytes)` parts.
pub async fn post_multipart_auth(
    app: Router,
    uri: &str,
    token: &str,
    parts: &[(&str, &str, &[u8])],
) -> Response<Body> {
    let boundary = "showroom-test-boundary";
    let mut body: Vec<u8> = Vec::new();
    for (field, file_name, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

    let request = builder(Method::POST, uri, Some(token))
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .expect("request");
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// PNG signature followed by padding; enough for format sniffing.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
