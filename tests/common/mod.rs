#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use jobboard_backend::{
    config::Config, database::memory::MemoryStore, routes, AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        database_url: "memory://".into(),
        database_max_connections: 1,
        jwt_secret: "test_secret_key".into(),
        token_ttl_hours: 1,
    }
}

pub fn app() -> Router {
    routes::router(AppState::new(Arc::new(MemoryStore::new()), &test_config()))
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
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
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, json)
}

/// Registers a user and returns `(token, user_id)`.
pub async fn signup(app: &Router, name: &str, email: &str, role: &str) -> (String, i64) {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "secret123",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

pub fn backend_job() -> JsonValue {
    json!({
        "title": "Backend Engineer",
        "company": "Acme",
        "location": "Remote",
        "description": "...",
        "requirements": "Go, SQL",
    })
}

/// Creates `job` as the given HR user and returns its id.
pub async fn create_job(app: &Router, token: &str, hr_id: i64, job: JsonValue) -> i64 {
    let (status, body) = call(
        app,
        Method::POST,
        &format!("/api/jobs/create/{}", hr_id),
        Some(token),
        Some(job),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create job failed: {}", body);
    body["job"]["id"].as_i64().unwrap()
}
