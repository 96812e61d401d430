#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, Response};
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tower::ServiceExt;

use crm_api::config::{Config, DatabaseConfig, JwtConfig, ServerConfig};
use crm_api::db::MemoryStore;
use crm_api::{app, AppState};

pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            expiry_hours: 1,
        },
    }
}

/// Fresh router over an empty in-memory store. Every test gets its own
/// isolated collection state.
pub fn setup_test_app() -> Router {
    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        config: test_config(),
    };
    app(state)
}

pub async fn send_request(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }

    let request = if let Some(json) = body {
        let bytes = serde_json::to_vec(&json).expect("serialize body");
        builder
            .header("content-type", "application/json")
            .body(Body::from(bytes))
            .expect("build request")
    } else {
        builder.body(Body::empty()).expect("build request")
    };

    app.clone().oneshot(request).await.expect("request")
}

pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

/// Create a document through the API and return the response `result`.
pub async fn create_document(app: &Router, resource: &str, body: Value) -> Value {
    let response = send_request(
        app,
        Method::POST,
        &format!("/api/{resource}/create"),
        None,
        Some(body),
    )
    .await;

    assert_eq!(response.status(), 200, "create {resource} should succeed");
    let envelope: Value = read_json(response).await;
    envelope["result"].clone()
}

/// Register an admin account and log in, returning the session token.
pub async fn login_admin(app: &Router, email: &str, password: &str) -> String {
    create_document(
        app,
        "admin",
        json!({
            "email": email,
            "password": password,
            "name": "Test",
            "surname": "Admin",
        }),
    )
    .await;

    let response = send_request(
        app,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status(), 200, "login should succeed");

    let envelope: Value = read_json(response).await;
    envelope["result"]["token"]
        .as_str()
        .expect("token present")
        .to_string()
}

pub fn doc_id(result: &Value) -> String {
    result["_id"].as_str().expect("document id").to_string()
}
