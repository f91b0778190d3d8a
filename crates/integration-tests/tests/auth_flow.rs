//! Integration tests for registration, login, and session auth.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p copperleaf-api)
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use copperleaf_integration_tests::{api_base_url, client, register, unique_email};
use reqwest::StatusCode;
use serde_json::{Value, json};

const PASSWORD: &str = "correct-horse-battery";

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_register_establishes_session() {
    let email = unique_email();
    let (client, user) = register(&email, PASSWORD).await;
    let base_url = api_base_url();

    // Response must not leak the password hash
    assert_eq!(user["email"], email);
    assert!(user.get("password_hash").is_none());
    assert!(user.get("password").is_none());

    // The session cookie from registration authenticates /users/me
    let resp = client
        .get(format!("{base_url}/api/users/me"))
        .send()
        .await
        .expect("Failed to get current user");

    assert_eq!(resp.status(), StatusCode::OK);
    let me: Value = resp.json().await.expect("Failed to parse user");
    assert_eq!(me["email"], email);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_registration_conflicts() {
    let email = unique_email();
    let (_, _) = register(&email, PASSWORD).await;
    let base_url = api_base_url();

    let resp = client()
        .post(format!("{base_url}/api/register"))
        .json(&json!({
            "email": email,
            "name": "Second Attempt",
            "password": PASSWORD,
        }))
        .send()
        .await
        .expect("Failed to send duplicate registration");

    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_login_rejects_wrong_password() {
    let email = unique_email();
    let (_, _) = register(&email, PASSWORD).await;
    let base_url = api_base_url();

    let resp = client()
        .post(format!("{base_url}/api/login"))
        .json(&json!({
            "email": email,
            "password": "not-the-password",
        }))
        .send()
        .await
        .expect("Failed to send login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_logout_ends_session() {
    let email = unique_email();
    let (client, _) = register(&email, PASSWORD).await;
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/api/logout"))
        .send()
        .await
        .expect("Failed to log out");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Session is gone, so the account endpoint rejects the same client
    let resp = client
        .get(format!("{base_url}/api/users/me"))
        .send()
        .await
        .expect("Failed to get current user");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_admin_routes_reject_anonymous_and_regular_users() {
    let base_url = api_base_url();

    // Anonymous: 401
    let resp = client()
        .get(format!("{base_url}/api/admin/stats"))
        .send()
        .await
        .expect("Failed to get stats");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Authenticated non-admin: 403
    let email = unique_email();
    let (client, _) = register(&email, PASSWORD).await;
    let resp = client
        .get(format!("{base_url}/api/admin/stats"))
        .send()
        .await
        .expect("Failed to get stats");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
