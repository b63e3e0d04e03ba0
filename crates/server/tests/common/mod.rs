//! # Common Test Utilities
//!
//! Shared infrastructure for the API integration tests: an in-memory SQLite
//! database with migrations applied, the full router, and helpers to drive
//! it with JSON requests.

#![allow(dead_code)]

use std::sync::Once;

use auth::JwtConfig;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use server::{AppState, create_app_router, middleware::security_headers::CorsConfig, router::create_app_router_with_cors};
use tower::ServiceExt;

/// Initialize test logging (run once per test session)
static INIT: Once = Once::new();

pub const TEST_PASSWORD: &str = "secret123";
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-integration-tests-32bytes-long";

/// Initialize test environment including structured logging
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A running application backed by its own in-memory database.
pub struct TestApp {
    pub state:  AppState,
    pub router: Router,
}

/// A registered user and their bearer token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id:    String,
    pub email: String,
    pub token: String,
}

/// Status and parsed JSON body (or `Value::Null` for non-JSON bodies).
pub struct TestResponse {
    pub status:  StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body:    Value,
    pub bytes:   Vec<u8>,
}

impl TestResponse {
    pub fn message(&self) -> &str { self.body["message"].as_str().unwrap_or_default() }
}

impl TestApp {
    pub async fn new() -> Self {
        init_test_env();

        let db = migration::connect_in_memory()
            .await
            .expect("Failed to create in-memory database");
        let state = AppState::new(db, JwtConfig::new(TEST_JWT_SECRET));
        let router = create_app_router_with_cors(state.clone(), CorsConfig::default());

        Self {
            state,
            router,
        }
    }

    /// Router built the way the server builds it, CORS origins from the environment.
    pub fn default_router(&self) -> Router { create_app_router(self.state.clone()) }

    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => {
                builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap()
            },
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            bytes,
        }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse { self.request("GET", uri, Some(token), None).await }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request("DELETE", uri, Some(token), None).await
    }

    /// Register a user with `role` and return their id and token.
    pub async fn register(&self, name: &str, role: &str) -> TestUser {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": TEST_PASSWORD,
                    "role": role,
                })),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "register failed: {}",
            response.body
        );

        TestUser {
            id: response.body["_id"].as_str().unwrap().to_string(),
            email,
            token: response.body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Create a project as `owner` (who must be an admin).
    pub async fn create_project(&self, owner: &TestUser, title: &str, members: &[&TestUser]) -> String {
        let member_ids: Vec<&str> = members.iter().map(|m| m.id.as_str()).collect();
        let response = self
            .post(
                "/api/projects",
                &owner.token,
                json!({ "title": title, "members": member_ids }),
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "create project failed: {}",
            response.body
        );
        response.body["_id"].as_str().unwrap().to_string()
    }

    /// Create a task and return its id.
    pub async fn create_task(&self, user: &TestUser, project_id: &str, body: Value) -> String {
        let mut body = body;
        body["projectId"] = json!(project_id);
        let response = self.post("/api/tasks", &user.token, body).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "create task failed: {}",
            response.body
        );
        response.body["_id"].as_str().unwrap().to_string()
    }
}
