//! Payment processor webhook handler.
//!
//! The only writer of order rows. The handler consumes the raw body
//! (`Bytes`), because the signature covers the exact bytes on the wire;
//! no JSON extractor may run first. Order line items are rebuilt from the
//! processor's record of the session, not from the local cart row.
//!
//! Redelivery is safe: order creation is keyed on the checkout session id,
//! so a second delivery of the same event finds the existing order and
//! acknowledges without writing.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, instrument, warn};

use copperleaf_core::{OrderId, UserId};

use crate::db::orders::OrderInsert;
use crate::db::{CartRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::order::OrderItem;
use crate::payments::types::{CHECKOUT_COMPLETED, metadata_keys};
use crate::payments::{PaymentsError, SessionLineItem, WebhookEvent};
use crate::state::AppState;

/// Signature header set by the payment processor.
pub const SIGNATURE_HEADER: &str = "Webhook-Signature";

/// Webhook acknowledgement body.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
}

impl WebhookAck {
    const fn ignored() -> Self {
        Self {
            received: true,
            order_id: None,
        }
    }
}

/// `POST /api/webhook` - handle a processor event.
#[instrument(skip(state, headers, body))]
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("missing signature header".to_owned()))?;

    state
        .payments()
        .verify_webhook_signature(signature, &body)?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("malformed event payload: {e}")))?;

    if event.event_type != CHECKOUT_COMPLETED {
        info!(event_type = %event.event_type, "ignoring webhook event");
        return Ok(Json(WebhookAck::ignored()));
    }

    let session = event.data.object;

    let user_id: UserId = session
        .metadata
        .get(metadata_keys::USER_ID)
        .and_then(|value| value.parse().ok())
        .ok_or_else(|| {
            AppError::BadRequest("session metadata is missing a valid user_id".to_owned())
        })?;

    // The processor's record of what was purchased is the source of truth.
    let line_items = state.payments().session_line_items(&session.id).await?;
    let items = order_items_from_session(&line_items)?;
    let total = order_total(&items);

    let repository = OrderRepository::new(state.pool());
    let insert = repository
        .create(
            user_id,
            &session.id,
            &items,
            total,
            session.shipping_address.as_ref(),
        )
        .await?;

    let order = match insert {
        OrderInsert::Created(order) => {
            // The purchase is final; the in-progress selection it came from
            // is done.
            CartRepository::new(state.pool()).clear(user_id).await?;
            info!(order_id = %order.id, session_id = %session.id, "order created");
            order
        }
        OrderInsert::AlreadyRecorded(order) => {
            warn!(
                order_id = %order.id,
                session_id = %session.id,
                "webhook redelivered for an already-recorded session"
            );
            order
        }
    };

    Ok(Json(WebhookAck {
        received: true,
        order_id: Some(order.id),
    }))
}

/// Rebuild order items from the processor's line items.
///
/// Product id, size, and color come back out of the string metadata the
/// checkout put in. A line without a parseable product id is rejected:
/// redelivery would fail the same way, so this is a 400, not a 500.
fn order_items_from_session(
    line_items: &[SessionLineItem],
) -> std::result::Result<Vec<OrderItem>, PaymentsError> {
    line_items
        .iter()
        .map(|line| {
            let product_id = line
                .metadata
                .get(metadata_keys::PRODUCT_ID)
                .and_then(|value| value.parse().ok())
                .ok_or_else(|| {
                    PaymentsError::InvalidLineItem(format!(
                        "line item {:?} has no product_id metadata",
                        line.name
                    ))
                })?;

            Ok(OrderItem {
                product_id,
                name: line.name.clone(),
                price: Decimal::new(line.unit_amount, 2),
                image: line
                    .metadata
                    .get(metadata_keys::IMAGE)
                    .cloned()
                    .unwrap_or_default(),
                quantity: line.quantity,
                size: line.metadata.get(metadata_keys::SIZE).cloned(),
                color: line.metadata.get(metadata_keys::COLOR).cloned(),
            })
        })
        .collect()
}

/// Order total: sum of price × quantity across items.
fn order_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use copperleaf_core::ProductId;

    use super::*;

    fn line(name: &str, unit_amount: i64, quantity: u32, product_id: Option<&str>) -> SessionLineItem {
        let mut metadata = BTreeMap::new();
        if let Some(id) = product_id {
            metadata.insert(metadata_keys::PRODUCT_ID.to_owned(), id.to_owned());
        }
        metadata.insert(metadata_keys::IMAGE.to_owned(), "/images/x.jpg".to_owned());
        metadata.insert(metadata_keys::SIZE.to_owned(), "L".to_owned());

        SessionLineItem {
            name: name.to_owned(),
            unit_amount,
            quantity,
            metadata,
        }
    }

    #[test]
    fn test_order_items_rebuilt_from_metadata() {
        let items = order_items_from_session(&[line("Wool Beanie", 1250, 2, Some("42"))])
            .expect("valid line items");

        let item = items.first().expect("one item");
        assert_eq!(item.product_id, ProductId::new(42));
        assert_eq!(item.price, Decimal::new(1250, 2));
        assert_eq!(item.quantity, 2);
        assert_eq!(item.size.as_deref(), Some("L"));
        assert_eq!(item.color, None);
        assert_eq!(item.image, "/images/x.jpg");
    }

    #[test]
    fn test_missing_product_id_rejected() {
        let result = order_items_from_session(&[line("Mystery", 100, 1, None)]);
        assert!(matches!(result, Err(PaymentsError::InvalidLineItem(_))));
    }

    #[test]
    fn test_unparseable_product_id_rejected() {
        let result = order_items_from_session(&[line("Mystery", 100, 1, Some("prod_abc"))]);
        assert!(matches!(result, Err(PaymentsError::InvalidLineItem(_))));
    }

    #[test]
    fn test_order_total_sums_lines() {
        let items = order_items_from_session(&[
            line("A", 1999, 2, Some("1")),
            line("B", 500, 3, Some("2")),
        ])
        .expect("valid line items");

        // 2 × $19.99 + 3 × $5.00
        assert_eq!(order_total(&items), Decimal::new(5498, 2));
    }

    #[test]
    fn test_order_total_empty() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }
}
