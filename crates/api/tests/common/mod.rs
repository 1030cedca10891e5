#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use inventory_api::auth::password::hash_password;
use inventory_api::config::{LogFormat, ServerConfig};
use inventory_api::router::build_app_router;
use inventory_api::state::AppState;
use inventory_core::roles::Role;
use inventory_core::store::memory::{MemorySessionStore, MemoryUserStore};
use inventory_core::store::UserStore;
use inventory_core::user::{NewUser, User};
use tower::ServiceExt;

/// Password given to every user created by [`TestApp::create_user`].
pub const PASSWORD: &str = "password123";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        database_max_connections: 1,
        cors_origins: vec![HeaderValue::from_static("http://localhost:5173")],
        request_timeout_secs: 30,
        session_ttl_hours: 24,
        log_format: LogFormat::Pretty,
    }
}

/// The full application router plus handles on its in-memory stores.
pub struct TestApp {
    pub router: Router,
    pub users: Arc<MemoryUserStore>,
    pub sessions: Arc<MemorySessionStore>,
}

/// Build the full application router with all middleware layers over fresh
/// in-memory stores.
pub fn build_test_app() -> TestApp {
    let config = test_config();
    let users = Arc::new(MemoryUserStore::new());
    let sessions = Arc::new(MemorySessionStore::new());

    let state = AppState {
        config: Arc::new(config.clone()),
        sessions: sessions.clone(),
        users: users.clone(),
    };

    TestApp {
        router: build_app_router(state, &config),
        users,
        sessions,
    }
}

impl TestApp {
    /// Clone of the router, ready for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Insert a user directly into the store with [`PASSWORD`].
    pub async fn create_user(&self, name: &str, email: &str, role: Role) -> User {
        self.users
            .create(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(PASSWORD).expect("hashing should succeed"),
                role,
            })
            .await
            .expect("user creation should succeed")
    }

    /// Log in through the API and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        let body = serde_json::json!({ "email": email, "password": PASSWORD });
        let response = post_json(self.app(), "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), 200, "login for {email} should succeed");
        let json = body_json(response).await;
        json["access_token"]
            .as_str()
            .expect("access_token must be a string")
            .to_string()
    }

    /// Create a user with `role` and log it in.
    pub async fn user_with_token(&self, role: Role) -> (User, String) {
        let email = format!("{}@test.com", role.as_str());
        let user = self.create_user(&format!("Test {role}"), &email, role).await;
        let token = self.login(&email).await;
        (user, token)
    }
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

/// GET with a raw `Authorization` header value.
pub async fn get_with_authorization(
    app: Router,
    uri: &str,
    authorization: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
