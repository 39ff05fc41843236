#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use redress_api::auth::jwt::JwtConfig;
use redress_api::config::ServerConfig;
use redress_api::router::build_app_router;
use redress_api::state::AppState;
use redress_core::complaint::ComplaintDraft;
use redress_core::lifecycle::TransitionPolicy;
use redress_core::roles::{ROLE_ADMIN, ROLE_USER};
use redress_db::models::complaint::Complaint;
use redress_db::models::user::{CreateUser, User};
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 60,
        },
        transition_policy: TransitionPolicy::Unrestricted,
        dashboard_recent_limit: 5,
        bootstrap_admin: None,
    }
}

/// A full application router over a fresh in-memory store, plus the state
/// so tests can seed data directly.
pub fn build_test_app() -> (Router, AppState) {
    build_test_app_with(test_config())
}

pub fn build_test_app_with(config: ServerConfig) -> (Router, AppState) {
    let state = AppState::in_memory(config);
    (build_app_router(state.clone()), state)
}

/// A seeded account and a valid bearer token for it.
pub struct TestUser {
    pub user: User,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> i64 {
        self.user.id
    }
}

/// Insert a user directly (with a placeholder hash) and mint a token.
pub async fn seed_user(state: &AppState, name: &str, role: &str) -> TestUser {
    let user = state
        .users
        .create_user(&CreateUser {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "unused".to_string(),
            role: role.to_string(),
        })
        .await
        .expect("user insert should succeed")
        .expect("email should be unique");
    let token = state
        .config
        .jwt
        .issue(user.id, &user.role)
        .expect("token generation should succeed")
        .token;
    TestUser { user, token }
}

pub async fn seed_regular(state: &AppState, name: &str) -> TestUser {
    seed_user(state, name, ROLE_USER).await
}

pub async fn seed_admin(state: &AppState, name: &str) -> TestUser {
    seed_user(state, name, ROLE_ADMIN).await
}

/// Insert a complaint directly through the store.
pub async fn seed_complaint(state: &AppState, owner: &TestUser, title: &str) -> Complaint {
    let draft = ComplaintDraft::from_input(title, "Seeded complaint description", None, None)
        .expect("seed draft should be valid");
    state
        .complaints
        .create_complaint(owner.id(), &draft)
        .await
        .expect("complaint insert should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
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

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Read the response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
