//! Cart item model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use copperleaf_core::ProductId;

/// One line in a user's cart.
///
/// Name, price, and image are snapshots taken by the client when the item
/// was added; the server stores them verbatim. The whole items array is
/// replaced on every cart write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
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

impl CartItem {
    /// Line subtotal (price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Sum of line subtotals across a cart.
#[must_use]
pub fn subtotal(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Decimal, quantity: u32) -> CartItem {
        CartItem {
            product_id: ProductId::new(1),
            name: "Wool Beanie".to_string(),
            price,
            image: "/images/beanie.jpg".to_string(),
            quantity,
            size: None,
            color: Some("rust".to_string()),
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(
            item(Decimal::new(1250, 2), 3).line_total(),
            Decimal::new(3750, 2)
        );
    }

    #[test]
    fn test_subtotal() {
        let items = vec![item(Decimal::new(1250, 2), 2), item(Decimal::new(999, 2), 1)];
        assert_eq!(subtotal(&items), Decimal::new(3499, 2));
    }

    #[test]
    fn test_subtotal_empty() {
        assert_eq!(subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_serde_omits_absent_options() {
        let json = serde_json::to_value(item(Decimal::new(999, 2), 1)).expect("serialize");
        assert!(json.get("size").is_none());
        assert_eq!(json["color"], "rust");
    }
}
