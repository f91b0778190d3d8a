//! Payment processor API client.
//!
//! Copperleaf delegates the entire payment lifecycle to a hosted-checkout
//! processor: checkout creates a processor-side session and redirects the
//! shopper to the processor's page, and the processor calls our webhook
//! once payment completes. This module owns both directions of that seam.
//!
//! # API shape
//!
//! - `POST {base}/v1/checkout/sessions` - create a hosted checkout session
//! - `GET  {base}/v1/checkout/sessions/{id}/line_items` - purchased lines
//! - Webhook signature header: `Webhook-Signature: t=<unix>,v1=<hex>` where
//!   `v1 = HMAC-SHA256(webhook_secret, "{t}.{raw body}")`

pub mod types;

pub use types::{
    CheckoutSession, CheckoutSessionRequest, LineItemInput, SessionLineItem, WebhookEvent,
    line_items_from_cart,
};

use std::sync::Arc;

use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;

use crate::config::PaymentsConfig;

/// Maximum accepted webhook timestamp skew, in seconds.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Errors that can occur when interacting with the payment processor.
#[derive(Debug, Error)]
pub enum PaymentsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the request or parse the response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Unauthorized (invalid API key).
    #[error("unauthorized: invalid API key")]
    Unauthorized,

    /// Webhook signature did not verify.
    #[error("invalid webhook signature: {0}")]
    InvalidSignature(String),

    /// A cart item could not be expressed as a processor line item.
    #[error("invalid line item: {0}")]
    InvalidLineItem(String),
}

/// Payment processor API client.
///
/// Cheaply cloneable; the HTTP connection pool and secrets live behind an
/// `Arc`.
#[derive(Clone)]
pub struct PaymentsClient {
    inner: Arc<PaymentsClientInner>,
}

struct PaymentsClientInner {
    client: reqwest::Client,
    api_base: String,
    webhook_secret: SecretString,
}

impl std::fmt::Debug for PaymentsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentsClient")
            .field("api_base", &self.inner.api_base)
            .field("webhook_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl PaymentsClient {
    /// Create a new payment processor client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &PaymentsConfig) -> Result<Self, PaymentsError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymentsError::Parse(format!("invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(PaymentsClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_owned(),
                webhook_secret: config.webhook_secret.clone(),
            }),
        })
    }

    /// Create a hosted checkout session and return its redirect URL.
    ///
    /// # Errors
    ///
    /// Returns `PaymentsError::Api` if the processor rejects the session.
    #[instrument(skip(self, request), fields(line_items = request.line_items.len()))]
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, PaymentsError> {
        let response = self
            .inner
            .client
            .post(format!("{}/v1/checkout/sessions", self.inner.api_base))
            .json(request)
            .send()
            .await?;

        let session = Self::parse_response(response).await?;
        Ok(session)
    }

    /// Fetch the line items the processor recorded for a session.
    ///
    /// The webhook handler rebuilds order items from this, not from the
    /// local cart row.
    ///
    /// # Errors
    ///
    /// Returns `PaymentsError::Api` if the session is unknown to the processor.
    #[instrument(skip(self))]
    pub async fn session_line_items(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionLineItem>, PaymentsError> {
        #[derive(serde::Deserialize)]
        struct LineItemList {
            data: Vec<SessionLineItem>,
        }

        let response = self
            .inner
            .client
            .get(format!(
                "{}/v1/checkout/sessions/{session_id}/line_items",
                self.inner.api_base
            ))
            .send()
            .await?;

        let list: LineItemList = Self::parse_response(response).await?;
        Ok(list.data)
    }

    /// Verify a webhook signature over the raw request body.
    ///
    /// Expects the `Webhook-Signature` header value in the form
    /// `t=<unix seconds>,v1=<hex digest>`. Rejects events whose timestamp
    /// is more than five minutes from now to limit replay.
    ///
    /// # Errors
    ///
    /// Returns `PaymentsError::InvalidSignature` on any mismatch.
    pub fn verify_webhook_signature(
        &self,
        signature_header: &str,
        body: &[u8],
    ) -> Result<(), PaymentsError> {
        let now_secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| PaymentsError::InvalidSignature(e.to_string()))?
            .as_secs();
        let now = i64::try_from(now_secs)
            .map_err(|_| PaymentsError::InvalidSignature("system time overflow".to_owned()))?;

        verify_signature(
            self.inner.webhook_secret.expose_secret().as_bytes(),
            signature_header,
            body,
            now,
        )
    }

    /// Read a JSON response, mapping processor error statuses.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentsError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(PaymentsError::Unauthorized);
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = response
            .json::<T>()
            .await
            .map_err(|e| PaymentsError::Parse(e.to_string()))?;

        Ok(parsed)
    }
}

/// Signature verification against an explicit clock, kept free of
/// `SystemTime` so it can be tested deterministically.
fn verify_signature(
    secret: &[u8],
    signature_header: &str,
    body: &[u8],
    now: i64,
) -> Result<(), PaymentsError> {
    let mut timestamp: Option<&str> = None;
    let mut digest: Option<&str> = None;

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value),
            Some(("v1", value)) => digest = Some(value),
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| PaymentsError::InvalidSignature("missing timestamp".to_owned()))?;
    let digest =
        digest.ok_or_else(|| PaymentsError::InvalidSignature("missing v1 digest".to_owned()))?;

    let ts: i64 = timestamp
        .parse()
        .map_err(|_| PaymentsError::InvalidSignature("invalid timestamp".to_owned()))?;

    if (now - ts).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(PaymentsError::InvalidSignature(
            "timestamp outside tolerance".to_owned(),
        ));
    }

    let expected = hex::decode(digest)
        .map_err(|_| PaymentsError::InvalidSignature("digest is not hex".to_owned()))?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret)
        .map_err(|e| PaymentsError::InvalidSignature(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| PaymentsError::InvalidSignature("digest mismatch".to_owned()))
}
