//! Shared test helpers for integration tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;

use society_api::{AppState, build_app};
use society_core::config::AppConfig;
use society_database::StoreManager;
use society_entity::{FlatKey, Principal, Role};

/// Password every seeded principal gets.
pub const PASSWORD: &str = "correct horse battery";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct service and live channel access
    pub state: AppState,
}

/// Response captured from the router
pub struct TestResponse {
    /// Status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// JSON body, or `Null` when the body is empty or not JSON
    pub body: Value,
}

impl TestApp {
    /// Create a new test application over fresh in-memory stores
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config, StoreManager::in_memory());
        let router = build_app(state.clone());
        Self { router, state }
    }

    /// Create a principal directly through the auth service
    pub async fn seed(&self, role: Role, email: &str) -> Principal {
        let flat = role.is_resident().then(|| FlatKey::new("B", "203").unwrap());
        self.state
            .auth_service
            .provision(role, "Test Person", email, PASSWORD, flat)
            .await
            .expect("Failed to seed principal")
    }

    /// Log in over HTTP and return the token
    pub async fn login(&self, email: &str, role: Role) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({
                    "email": email,
                    "password": PASSWORD,
                    "role": role,
                })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Seed a principal and log in as them
    pub async fn seed_and_login(&self, role: Role, email: &str) -> (Principal, String) {
        let principal = self.seed(role, email).await;
        let token = self.login(email, role).await;
        (principal, token)
    }

    /// Make a request against the router
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    /// Send a prebuilt request
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Register a live connection joined to the principal's rooms, acks drained
    pub fn connect(&self, principal: &Principal) -> mpsc::Receiver<String> {
        let manager = &self.state.realtime.connections;
        let (handle, mut rx) = manager.register(principal.clone());
        if let Some(room) = principal.role.room() {
            manager.handle_inbound(&handle.id, &format!(r#"{{"event":"join-role","data":"{room}"}}"#));
            rx.try_recv().unwrap();
        }
        manager.handle_inbound(
            &handle.id,
            &format!(r#"{{"event":"join-user","data":{}}}"#, principal.id),
        );
        rx.try_recv().unwrap();
        rx
    }
}

/// Every frame currently queued, parsed
pub fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).unwrap());
    }
    frames
}

/// Event names of the given frames
pub fn event_names(frames: &[Value]) -> Vec<&str> {
    frames
        .iter()
        .map(|f| f["event"].as_str().unwrap_or_default())
        .collect()
}
