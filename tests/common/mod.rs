//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use jobly_api::app;
use jobly_api::config::{AppEnv, Config};
use jobly_api::repos::job_repo::NewJob;
use jobly_api::repos::user_repo::UserRow;
use jobly_api::services::auth::{Principal, password::hash_password};
use jobly_api::state::AppState;
use serde_json::Value;
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-key";
pub const PASSWORD: &str = "password1";

pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().expect("addr"),
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        secret_key: SECRET.to_string(),
        token_ttl_seconds: None,
        token_leeway_seconds: 60,
        bootstrap_admin: None,
    }
}

/// Argon2 is slow in debug builds; hash the shared password once.
fn password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).expect("hashing should succeed"))
        .clone()
}

fn user(username: &str, is_admin: bool) -> UserRow {
    UserRow {
        username: username.to_string(),
        password_hash: password_hash(),
        first_name: format!("{username}F"),
        last_name: format!("{username}L"),
        email: format!("{username}@email.com"),
        is_admin,
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Users `u1`, `u2` (non-admin) and `admin`; jobs 1..=3 (`j1`..`j3`) at company `c1`.
    pub async fn new() -> Self {
        let config = test_config();
        let state = app::build_state(&config).await.expect("state should build");

        for (name, is_admin) in [("u1", false), ("u2", false), ("admin", true)] {
            state
                .users
                .create(user(name, is_admin))
                .await
                .expect("seed user");
        }

        for (title, salary, equity) in [
            ("j1", Some(100), Some(0.1)),
            ("j2", Some(200), Some(0.2)),
            ("j3", Some(300), None),
        ] {
            state
                .jobs
                .create(NewJob {
                    title: title.to_string(),
                    salary,
                    equity,
                    company_handle: "c1".to_string(),
                })
                .await;
        }

        let router = app::build_router(state.clone(), &config);
        Self { router, state }
    }

    pub fn token_for(&self, username: &str, is_admin: bool) -> String {
        self.state
            .tokens
            .issue(&Principal::new(username, is_admin))
            .expect("issue should succeed")
    }

    pub fn u1_token(&self) -> String {
        self.token_for("u1", false)
    }

    pub fn admin_token(&self) -> String {
        self.token_for("admin", true)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        (status, body_json(response.into_body()).await)
    }

    /// `token` is sent as `Authorization: Bearer <token>`.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        self.send(request).await
    }

    /// Send with a raw `Authorization` header value (or none).
    pub async fn call_with_authorization(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        self.send(builder.body(Body::empty()).expect("request should build"))
            .await
    }
}

pub async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn unauthorized_body() -> Value {
    serde_json::json!({ "error": { "code": "UNAUTHORIZED", "message": "unauthorized" } })
}
