//! Order model.
//!
//! Orders are written exactly once, by the payment webhook, and are
//! immutable afterwards. Line items are snapshots re-derived from the
//! payment session, not copies of the cart row.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use copperleaf_core::{OrderId, OrderStatus, ProductId, UserId};

use super::user::Address;

/// One purchased line, snapshotted at payment time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A completed order.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub checkout_session_id: String,
    pub items: Json<Vec<OrderItem>>,
    pub total: Decimal,
    pub shipping_address: Option<Json<Address>>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
