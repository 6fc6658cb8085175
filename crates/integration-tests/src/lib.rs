//! Integration tests for Boardhouse.
//!
//! Each test spawns the storefront and a stub shop API in-process on
//! ephemeral ports, with a fresh data directory per test, so no external
//! services are required.
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart behavior over HTTP, durability across restarts,
//!   checkout
//! - `auth_flow` - Login, registration, logout, protected pages

use std::path::PathBuf;

use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use boardhouse_storefront::config::ShopConfig;
use boardhouse_storefront::state::AppState;
use serde_json::{Value, json};
use uuid::Uuid;

/// Username the stub auth API accepts.
pub const STUB_USERNAME: &str = "demo";

/// Password the stub auth API accepts.
pub const STUB_PASSWORD: &str = "correct-horse";

/// A running storefront wired to a stub shop API.
pub struct TestApp {
    pub base_url: String,
    pub api_url: String,
    pub data_dir: PathBuf,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the stub API and the storefront on ephemeral ports.
    pub async fn spawn() -> Self {
        let api_url = spawn_stub_api().await;
        let data_dir = std::env::temp_dir().join(format!("boardhouse-it-{}", Uuid::new_v4()));
        Self::spawn_with(api_url, data_dir).await
    }

    /// Spawn a storefront against an existing stub API and data directory.
    ///
    /// Reusing the data directory across spawns simulates an app restart on
    /// the same durable store.
    pub async fn spawn_with(api_url: String, data_dir: PathBuf) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront listener");
        let addr = listener.local_addr().expect("storefront local addr");

        let config = ShopConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: format!("http://{addr}"),
            api_base_url: api_url.clone(),
            data_dir: data_dir.clone(),
            sentry_dsn: None,
        };

        let state = AppState::new(config).expect("build app state");
        let app = boardhouse_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("storefront serve");
        });

        // Redirects are asserted on, never followed.
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build http client");

        Self {
            base_url: format!("http://{addr}"),
            api_url,
            data_dir,
            client,
        }
    }

    /// Full URL for a storefront path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Fetch a page body.
    pub async fn get_text(&self, path: &str) -> String {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
            .text()
            .await
            .expect("response body")
    }
}

// =============================================================================
// Stub shop API
// =============================================================================

/// Products served by the stub API.
fn stub_products() -> Value {
    json!([
        {"id": 1, "name": "Arduino Uno R3", "description": "AVR development board", "price": "24.99", "stock": 12},
        {"id": 2, "name": "ESP32 Development Board", "description": "WiFi and Bluetooth dev board", "price": "29.99", "stock": 40},
        {"id": 3, "name": "Raspberry Pi 4 Model B", "description": "Quad-core single-board computer", "price": "249.99", "stock": 0},
        {"id": 4, "name": "R1", "description": "10k resistor pack", "price": "10", "stock": 100}
    ])
}

async fn stub_login(Json(body): Json<Value>) -> impl IntoResponse {
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    if username == STUB_USERNAME && password == STUB_PASSWORD {
        Json(json!({"access": "stub-access-token", "refresh": "stub-refresh-token"}))
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response()
    }
}

async fn stub_register(Json(body): Json<Value>) -> impl IntoResponse {
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();

    if username == "taken" {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        )
            .into_response()
    } else {
        (
            StatusCode::CREATED,
            Json(json!({"id": 7, "username": username, "email": email})),
        )
            .into_response()
    }
}

/// Spawn the stub shop API, returning its base URL.
pub async fn spawn_stub_api() -> String {
    let router = Router::new()
        .route("/products/", get(|| async { Json(stub_products()) }))
        .route("/auth/login/", post(stub_login))
        .route("/auth/register/", post(stub_register));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub api listener");
    let addr = listener.local_addr().expect("stub api local addr");

    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub api serve");
    });

    format!("http://{addr}")
}
