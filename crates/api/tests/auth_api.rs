//! HTTP-level tests for the `/auth` resource and admin provisioning.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_admin, get, get_auth, post_json, post_json_auth,
    TEST_PASSWORD,
};
use serde_json::json;
use showroom_api::bootstrap::provision_admin;
use showroom_api::error::AppError;
use showroom_db::repositories::UserRepo;
use sqlx::PgPool;

async fn login(app: &axum::Router, username: &str, password: &str) -> axum::response::Response {
    post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "username": username, "password": password }),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    create_admin(&pool, "manager").await;
    let app = build_test_app(pool);

    let response = login(&app, "manager", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["access_token"].as_str().is_some());
    assert!(json["refresh_token"].as_str().is_some());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["username"], "manager");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_admin(&pool, "manager").await;
    let app = build_test_app(pool);

    let response = login(&app, "manager", "not-the-password").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");

    // Unknown users get the same answer.
    let response = login(&app, "nobody", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_account_locks_after_repeated_failures(pool: PgPool) {
    create_admin(&pool, "manager").await;
    let app = build_test_app(pool.clone());

    for _ in 0..5 {
        let response = login(&app, "manager", "wrong-password").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // The correct password is refused while the lock holds.
    let response = login(&app, "manager", TEST_PASSWORD).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let user = UserRepo::find_by_username(&pool, "manager").await.unwrap().unwrap();
    assert!(user.locked_until.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_session_requires_token(pool: PgPool) {
    create_admin(&pool, "manager").await;
    let app = build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/session").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/auth/session", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(login(&app, "manager", TEST_PASSWORD).await).await;
    let token = json["access_token"].as_str().unwrap();
    let response = get_auth(app.clone(), "/api/v1/auth/session", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "manager");
    assert!(json["data"]["last_login_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    create_admin(&pool, "manager").await;
    let app = build_test_app(pool);

    let json = body_json(login(&app, "manager", TEST_PASSWORD).await).await;
    let first = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": first }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let second = json["refresh_token"].as_str().unwrap().to_string();
    assert_ne!(first, second);

    // The first token was consumed.
    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": first }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_revokes_refresh_tokens(pool: PgPool) {
    create_admin(&pool, "manager").await;
    let app = build_test_app(pool);

    let json = body_json(login(&app, "manager", TEST_PASSWORD).await).await;
    let access = json["access_token"].as_str().unwrap().to_string();
    let refresh = json["refresh_token"].as_str().unwrap().to_string();

    let response = post_json_auth(app.clone(), "/api/v1/auth/logout", &access, json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        json!({ "refresh_token": refresh }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_provision_admin_is_idempotent(pool: PgPool) {
    provision_admin(&pool, "owner", "a-long-enough-password").await.unwrap();
    provision_admin(&pool, "owner", "a-different-password!").await.unwrap();

    let user = UserRepo::find_by_username(&pool, "owner").await.unwrap().unwrap();
    let app = build_test_app(pool.clone());
    // The first password stays in force.
    let response = login(&app, &user.username, "a-long-enough-password").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_provision_admin_rejects_weak_password(pool: PgPool) {
    let result = provision_admin(&pool, "owner", "short").await;
    assert_matches!(result, Err(AppError::BadRequest(_)));
    assert!(UserRepo::find_by_username(&pool, "owner").await.unwrap().is_none());
}
