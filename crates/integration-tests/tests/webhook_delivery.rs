//! Integration tests for webhook signature checks and idempotent delivery.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running with `PAYMENTS_WEBHOOK_SECRET` matching
//!   this test's environment
//! - For the redelivery test, a payment processor stub that serves
//!   `GET /v1/checkout/sessions/{id}/line_items`
//!
//! Run with: cargo test -p copperleaf-integration-tests -- --ignored

use copperleaf_integration_tests::{api_base_url, client, sign_webhook, webhook_secret};
use reqwest::StatusCode;
use serde_json::{Value, json};
use uuid::Uuid;

fn completed_event(session_id: &str, user_id: i64) -> String {
    json!({
        "id": format!("evt_{}", Uuid::new_v4().simple()),
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": session_id,
                "metadata": { "user_id": user_id.to_string() },
            }
        }
    })
    .to_string()
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_webhook_rejects_missing_signature() {
    let base_url = api_base_url();
    let body = completed_event("cs_no_sig", 1);

    let resp = client()
        .post(format!("{base_url}/api/webhook"))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to post webhook");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_webhook_rejects_bad_signature() {
    let base_url = api_base_url();
    let body = completed_event("cs_bad_sig", 1);
    let signature = sign_webhook("definitely-not-the-secret", &body);

    let resp = client()
        .post(format!("{base_url}/api/webhook"))
        .header("Webhook-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to post webhook");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_webhook_acknowledges_unrelated_events() {
    let base_url = api_base_url();
    let body = json!({
        "id": "evt_unrelated",
        "type": "checkout.session.expired",
        "data": { "object": { "id": "cs_expired", "metadata": {} } }
    })
    .to_string();
    let signature = sign_webhook(&webhook_secret(), &body);

    let resp = client()
        .post(format!("{base_url}/api/webhook"))
        .header("Webhook-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to post webhook");

    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = resp.json().await.expect("Failed to parse ack");
    assert_eq!(ack["received"], true);
    assert!(ack.get("order_id").is_none());
}

#[tokio::test]
#[ignore = "Requires running API server, database, and payment processor stub"]
async fn test_webhook_redelivery_creates_one_order() {
    let base_url = api_base_url();
    let secret = webhook_secret();

    // Fresh session id per run so reruns never collide
    let session_id = format!("cs_it_{}", Uuid::new_v4().simple());
    let body = completed_event(&session_id, 1);

    // First delivery creates the order
    let signature = sign_webhook(&secret, &body);
    let resp = client()
        .post(format!("{base_url}/api/webhook"))
        .header("Webhook-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body.clone())
        .send()
        .await
        .expect("Failed to post webhook");

    assert_eq!(resp.status(), StatusCode::OK);
    let first: Value = resp.json().await.expect("Failed to parse ack");
    let order_id = first["order_id"].clone();
    assert!(!order_id.is_null());

    // Redelivery of the same event (fresh timestamp, same body) must
    // acknowledge the existing order, not create a second one
    let signature = sign_webhook(&secret, &body);
    let resp = client()
        .post(format!("{base_url}/api/webhook"))
        .header("Webhook-Signature", signature)
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("Failed to redeliver webhook");

    assert_eq!(resp.status(), StatusCode::OK);
    let second: Value = resp.json().await.expect("Failed to parse ack");
    assert_eq!(second["order_id"], order_id);
}
