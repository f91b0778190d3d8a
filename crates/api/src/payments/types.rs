//! Wire types for the payment processor API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use copperleaf_core::to_cents;

use super::PaymentsError;
use crate::models::CartItem;

/// One line item sent when creating a checkout session.
///
/// Amounts are integer cents. Product id, size, and color ride along as
/// string metadata; the processor stores nothing structured, so the webhook
/// handler parses them back out when reconstructing the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItemInput {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u32,
    pub currency: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Request body for `POST /v1/checkout/sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSessionRequest {
    pub success_url: String,
    pub cancel_url: String,
    pub line_items: Vec<LineItemInput>,
    pub metadata: BTreeMap<String, String>,
}

/// A created checkout session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted payment page the shopper is redirected to.
    pub url: String,
}

/// A line item as recorded processor-side for a completed session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionLineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u32,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// A webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

/// Payload of a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEventData {
    pub object: WebhookSession,
}

/// The checkout session embedded in a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSession {
    pub id: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Shipping details collected on the hosted page, if any.
    #[serde(default)]
    pub shipping_address: Option<crate::models::user::Address>,
}

/// Event type the webhook handler reconciles into an order.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Metadata keys used on sessions and line items.
pub mod metadata_keys {
    pub const USER_ID: &str = "user_id";
    pub const PRODUCT_ID: &str = "product_id";
    pub const IMAGE: &str = "image";
    pub const SIZE: &str = "size";
    pub const COLOR: &str = "color";
}

/// Build processor line items from a client-held cart.
///
/// One line item per cart item; the unit price converts to integer cents.
///
/// # Errors
///
/// Returns `PaymentsError::InvalidLineItem` for a non-positive quantity or
/// a price that cannot be expressed in cents.
pub fn line_items_from_cart(items: &[CartItem]) -> Result<Vec<LineItemInput>, PaymentsError> {
    items
        .iter()
        .map(|item| {
            if item.quantity == 0 {
                return Err(PaymentsError::InvalidLineItem(format!(
                    "zero quantity for product {}",
                    item.product_id
                )));
            }

            let unit_amount = to_cents(item.price).ok_or_else(|| {
                PaymentsError::InvalidLineItem(format!(
                    "price {} for product {} is not a valid amount",
                    item.price, item.product_id
                ))
            })?;

            let mut metadata = BTreeMap::new();
            metadata.insert(
                metadata_keys::PRODUCT_ID.to_owned(),
                item.product_id.to_string(),
            );
            metadata.insert(metadata_keys::IMAGE.to_owned(), item.image.clone());
            if let Some(size) = &item.size {
                metadata.insert(metadata_keys::SIZE.to_owned(), size.clone());
            }
            if let Some(color) = &item.color {
                metadata.insert(metadata_keys::COLOR.to_owned(), color.clone());
            }

            Ok(LineItemInput {
                name: item.name.clone(),
                unit_amount,
                quantity: item.quantity,
                currency: "usd".to_owned(),
                metadata,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use copperleaf_core::ProductId;

    use super::*;
    use crate::models::cart;

    fn item(id: i64, price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(id),
            name: format!("Product {id}"),
            price,
            image: format!("/images/{id}.jpg"),
            quantity,
            size: Some("M".to_string()),
            color: None,
        }
    }

    #[test]
    fn test_one_line_item_per_cart_item() {
        let items = vec![
            item(1, Decimal::new(1999, 2), 2),
            item(2, Decimal::new(500, 2), 1),
            item(3, Decimal::new(12345, 2), 4),
        ];

        let lines = line_items_from_cart(&items).expect("valid cart");
        assert_eq!(lines.len(), items.len());
    }

    #[test]
    fn test_line_item_totals_match_cart_subtotal() {
        let items = vec![
            item(1, Decimal::new(1999, 2), 2),
            item(2, Decimal::new(500, 2), 1),
            item(3, Decimal::new(12345, 2), 4),
        ];

        let lines = line_items_from_cart(&items).expect("valid cart");
        let line_total: i64 = lines
            .iter()
            .map(|l| l.unit_amount * i64::from(l.quantity))
            .sum();
        let subtotal_cents = to_cents(cart::subtotal(&items)).expect("subtotal fits");

        assert_eq!(line_total, subtotal_cents);
        assert_eq!(line_total, 2 * 1999 + 500 + 4 * 12345);
    }

    #[test]
    fn test_metadata_carries_variant_fields() {
        let mut with_color = item(7, Decimal::new(999, 2), 1);
        with_color.color = Some("moss".to_string());

        let lines = line_items_from_cart(&[with_color]).expect("valid cart");
        let metadata = &lines.first().expect("one line").metadata;

        assert_eq!(metadata.get(metadata_keys::PRODUCT_ID).map(String::as_str), Some("7"));
        assert_eq!(metadata.get(metadata_keys::SIZE).map(String::as_str), Some("M"));
        assert_eq!(metadata.get(metadata_keys::COLOR).map(String::as_str), Some("moss"));
        assert_eq!(
            metadata.get(metadata_keys::IMAGE).map(String::as_str),
            Some("/images/7.jpg")
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let result = line_items_from_cart(&[item(1, Decimal::new(999, 2), 0)]);
        assert!(matches!(result, Err(PaymentsError::InvalidLineItem(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = line_items_from_cart(&[item(1, Decimal::new(-999, 2), 1)]);
        assert!(matches!(result, Err(PaymentsError::InvalidLineItem(_))));
    }

    #[test]
    fn test_webhook_event_parses() {
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "id": "evt_123",
                "type": "checkout.session.completed",
                "data": {
                    "object": {
                        "id": "cs_456",
                        "metadata": {"user_id": "9"},
                        "shipping_address": {
                            "street": "12 Fern Way",
                            "city": "Portland",
                            "state": "OR",
                            "zip": "97201",
                            "country": "US"
                        }
                    }
                }
            }"#,
        )
        .expect("parse event");

        assert_eq!(event.event_type, CHECKOUT_COMPLETED);
        assert_eq!(event.data.object.id, "cs_456");
        assert_eq!(
            event.data.object.metadata.get("user_id").map(String::as_str),
            Some("9")
        );
        assert!(event.data.object.shipping_address.is_some());
    }
}
