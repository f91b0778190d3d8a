//! Integration tests for Copperleaf.
//!
//! These tests exercise a running API server over HTTP. They are ignored
//! by default because they need external services.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p copperleaf-cli -- migrate
//!
//! # Start the API server
//! cargo run -p copperleaf-api
//!
//! # Run integration tests
//! cargo test -p copperleaf-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - Base URL of the running API (default `http://localhost:4000`)
//! - `PAYMENTS_WEBHOOK_SECRET` - Webhook signing secret shared with the server

use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde_json::{Value, json};
use sha2::Sha256;
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Webhook signing secret shared with the server under test.
#[must_use]
pub fn webhook_secret() -> String {
    std::env::var("PAYMENTS_WEBHOOK_SECRET")
        .unwrap_or_else(|_| "whk-9Qr7Lx2TbV8pZsD4nGmE6yHcA3fJkU1W".to_string())
}

/// Create an HTTP client with a cookie store for session auth.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Generate a unique email so repeated runs never collide.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// Register a fresh account and return (client, user JSON).
///
/// Registration establishes a session, so the returned client is
/// already authenticated.
///
/// # Panics
///
/// Panics if the registration request fails.
pub async fn register(email: &str, password: &str) -> (Client, Value) {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/register"))
        .json(&json!({
            "email": email,
            "name": "Integration Test",
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), 201, "registration should succeed");
    let user: Value = resp.json().await.expect("Failed to parse user");
    (client, user)
}

/// Sign a webhook body the way the payment processor does.
///
/// Produces the `Webhook-Signature` header value
/// `t=<unix>,v1=<hex HMAC-SHA256(secret, "{t}.{body}")>`.
///
/// # Panics
///
/// Panics if the system clock is before the Unix epoch.
#[must_use]
pub fn sign_webhook(secret: &str, body: &str) -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before Unix epoch")
        .as_secs();

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(body.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    format!("t={timestamp},v1={signature}")
}
