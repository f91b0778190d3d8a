//! Checkout route handler.
//!
//! Converts the client-held cart into a hosted payment session and hands
//! back the redirect URL. The items come from the request body, not the
//! stored cart row, so what gets priced is exactly what the client showed
//! the shopper. The order itself is created later, by the webhook.

use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::models::CartItem;
use crate::payments::{CheckoutSessionRequest, line_items_from_cart};
use crate::payments::types::metadata_keys;
use crate::state::AppState;

/// Checkout payload: the client's cart snapshot.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
}

/// Response: where to send the shopper.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

/// `POST /api/checkout` - create a hosted payment session.
#[instrument(skip(state, user, request), fields(user_id = %user.0.id, items = request.items.len()))]
pub async fn create_session(
    user: RequireUser,
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    if request.items.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }

    let line_items = line_items_from_cart(&request.items)?;

    let base_url = state.config().base_url.trim_end_matches('/');
    let mut metadata = BTreeMap::new();
    metadata.insert(metadata_keys::USER_ID.to_owned(), user.0.id.to_string());

    let session = state
        .payments()
        .create_checkout_session(&CheckoutSessionRequest {
            success_url: format!("{base_url}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}"),
            cancel_url: format!("{base_url}/cart"),
            line_items,
            metadata,
        })
        .await?;

    info!(session_id = %session.id, "checkout session created");

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}
