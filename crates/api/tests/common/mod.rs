//! Shared helpers for API integration tests.
//!
//! Requests go through the real router (same middleware stack as `main.rs`)
//! via `tower::ServiceExt::oneshot`, without a TCP listener.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use reeltrack_api::auth::jwt::{generate_access_token, JwtConfig};
use reeltrack_api::auth::password::hash_password;
use reeltrack_api::config::{LogFormat, ServerConfig};
use reeltrack_api::router::build_app_router;
use reeltrack_api::state::AppState;
use reeltrack_db::models::user::{CreateUser, User};
use reeltrack_db::repositories::UserRepo;

/// Password given to every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "dailies-2026!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        upload_dir: std::env::temp_dir().join("reeltrack-api-tests"),
        max_upload_bytes: 1024 * 1024,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "reeltrack-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Full application router backed by `pool`, using [`test_config`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_config(pool, test_config())
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Test config whose uploads land in `dir` and are capped at `max_upload_bytes`.
pub fn upload_config(dir: PathBuf, max_upload_bytes: usize) -> ServerConfig {
    ServerConfig {
        upload_dir: dir,
        max_upload_bytes,
        ..test_config()
    }
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with `role` directly, bypassing registration.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@studio.test"),
            password_hash,
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create a user with `role` and return it with a ready-to-use token.
pub async fn login_as(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let user = create_user(pool, username, role).await;
    let token = token_for(&user);
    (user, token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST without an `Authorization` header.
pub async fn post_public(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

/// POST a raw (possibly malformed) JSON body.
pub async fn post_raw(app: Router, uri: &str, token: &str, raw: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(raw))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Read the response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert `status` and return the `data` field of the body.
pub async fn expect_data(response: Response, status: StatusCode) -> Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json["data"].clone()
}

/// Assert an error response with `status` and `code`; returns the body.
pub async fn expect_error(response: Response, status: StatusCode, code: &str) -> Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    assert_eq!(json["code"], code, "unexpected error code, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Ids of a full Project > Episode > Sequence > (Shot, Asset) chain.
#[derive(Debug, Clone, Copy)]
pub struct Hierarchy {
    pub project: i64,
    pub episode: i64,
    pub sequence: i64,
    pub shot: i64,
    pub asset: i64,
}

/// POST `body` to `uri`, expecting 201, and return the new id.
pub async fn create_id(app: &Router, uri: &str, token: &str, body: Value) -> i64 {
    let data = expect_data(
        post_json(app.clone(), uri, token, body).await,
        StatusCode::CREATED,
    )
    .await;
    data["id"].as_i64().expect("created entity should have an id")
}

/// Build a hierarchy whose codes are prefixed with `prefix`.
pub async fn seed_hierarchy(app: &Router, token: &str, prefix: &str) -> Hierarchy {
    let project = create_id(
        app,
        "/api/v1/projects",
        token,
        json!({ "code": prefix, "name": format!("{prefix} feature") }),
    )
    .await;
    let episode = create_id(
        app,
        &format!("/api/v1/projects/{project}/episodes"),
        token,
        json!({ "code": format!("{prefix}_EP01"), "name": "Pilot" }),
    )
    .await;
    let sequence = create_id(
        app,
        &format!("/api/v1/episodes/{episode}/sequences"),
        token,
        json!({ "code": format!("{prefix}_SQ010"), "name": "Opening" }),
    )
    .await;
    let shot = create_id(
        app,
        &format!("/api/v1/sequences/{sequence}/shots"),
        token,
        json!({
            "code": format!("{prefix}_SH0010"),
            "name": "Wide establishing",
            "cut_in": 1001,
            "cut_out": 1096,
        }),
    )
    .await;
    let asset = create_id(
        app,
        &format!("/api/v1/sequences/{sequence}/assets"),
        token,
        json!({ "code": format!("{prefix}_hero"), "name": "Hero", "asset_type": "character" }),
    )
    .await;

    Hierarchy {
        project,
        episode,
        sequence,
        shot,
        asset,
    }
}

/// Create a version on `(entity_type, entity_id)` and return its JSON.
pub async fn create_version(
    app: &Router,
    token: &str,
    entity_type: &str,
    entity_id: i64,
    code: &str,
) -> Value {
    expect_data(
        post_json(
            app.clone(),
            "/api/v1/versions",
            token,
            json!({
                "entity_type": entity_type,
                "entity_id": entity_id,
                "code": code,
                "name": format!("{code} comp"),
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await
}
