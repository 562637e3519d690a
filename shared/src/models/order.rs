//! Order and line item models
//!
//! The dispatcher only needs order identity and per-line quantities;
//! cart totals, payments and addresses belong to the host commerce
//! system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Completed order identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<String>,
    pub number: String,
    /// Completion timestamp (epoch millis)
    pub completed_at: Option<i64>,
}

/// One entry in an order: a quantity of a specific purchasable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Option<String>,
    pub order_id: Option<String>,
    pub purchasable_id: String,
    pub qty: i64,
    pub price: Decimal,
    /// Point-in-time copy of the purchasable captured at order time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Value>,
}

impl LineItem {
    /// Build the fulfillment record fanned out to one constituent:
    /// same line-item identity, quantity scaled by the constituent's
    /// per-unit multiplier.
    pub fn derived(&self, purchasable_id: &str, multiplier: i64) -> LineItem {
        LineItem {
            id: self.id.clone(),
            order_id: self.order_id.clone(),
            purchasable_id: purchasable_id.to_string(),
            qty: self.qty * multiplier,
            price: Decimal::ZERO,
            snapshot: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_scales_quantity_and_keeps_identity() {
        let item = LineItem {
            id: Some("line:1".to_string()),
            order_id: Some("order:1".to_string()),
            purchasable_id: "bundle:starter".to_string(),
            qty: 4,
            price: Decimal::new(4999, 2),
            snapshot: None,
        };

        let derived = item.derived("product:a", 2);
        assert_eq!(derived.id.as_deref(), Some("line:1"));
        assert_eq!(derived.order_id.as_deref(), Some("order:1"));
        assert_eq!(derived.purchasable_id, "product:a");
        assert_eq!(derived.qty, 8);
    }
}
