//! Bundle stock resolver
//!
//! A bundle's sellable quantity is bottlenecked by its scarcest
//! required constituent, scaled by how many units of that constituent
//! each bundle unit consumes (min-of-ratios over the bill of
//! materials).

use crate::models::{Bundle, LineItem};
use crate::purchasable::Purchasable;
use std::sync::Arc;

/// Sentinel for constituents that can never bottleneck the bundle
pub const UNLIMITED_STOCK: i64 = i64::MAX;

/// Stock level after capability resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Unlimited,
    Finite(i64),
}

/// One bundle constituent with its purchasable and stock level
/// resolved at composition-load time
#[derive(Clone)]
pub struct ResolvedConstituent {
    pub purchasable: Arc<dyn Purchasable>,
    /// Units of this constituent consumed per bundle unit
    pub qty: i64,
    pub available: StockLevel,
}

/// Availability-limited sellable quantity of a bundle
///
/// Minimum across all constituents of `floor(available / qty)`; a
/// bundle with no constituents has zero stock.
pub fn compute_available_stock(constituents: &[ResolvedConstituent]) -> i64 {
    constituents
        .iter()
        .map(|c| match c.available {
            StockLevel::Unlimited => UNLIMITED_STOCK,
            StockLevel::Finite(available) => (available / c.qty.max(1)).max(0),
        })
        .min()
        .unwrap_or(0)
}

/// Whether at least one unit of the bundle can be sold
pub fn has_stock(constituents: &[ResolvedConstituent]) -> bool {
    compute_available_stock(constituents) > 0
}

/// Clamp a cart line item to the bundle's available stock
///
/// Mutates the line item in place and returns the error messages to
/// surface on the active cart; requesting a quantity at or below the
/// available stock never changes the item. Never fails.
pub fn clamp_line_item(bundle: &Bundle, available: i64, line_item: &mut LineItem) -> Vec<String> {
    let mut errors = Vec::new();

    if line_item.qty > available {
        line_item.qty = available;
        errors.push(format!(
            "You reached the maximum stock of {}",
            bundle.description()
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppResult;
    use crate::models::Order;
    use crate::purchasable::StockCapability;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    struct FakeProduct {
        id: String,
        stock: StockCapability,
    }

    #[async_trait]
    impl Purchasable for FakeProduct {
        fn id(&self) -> &str {
            &self.id
        }

        fn description(&self) -> String {
            self.id.clone()
        }

        fn stock(&self) -> StockCapability {
            self.stock
        }

        async fn after_order_complete(&self, _order: &Order, _item: &LineItem) -> AppResult<()> {
            Ok(())
        }
    }

    fn constituent(id: &str, qty: i64, available: StockLevel) -> ResolvedConstituent {
        let stock = match available {
            StockLevel::Unlimited => StockCapability::Unlimited,
            StockLevel::Finite(n) => StockCapability::Finite(n),
        };
        ResolvedConstituent {
            purchasable: Arc::new(FakeProduct {
                id: id.to_string(),
                stock,
            }),
            qty,
            available,
        }
    }

    fn bundle() -> Bundle {
        Bundle {
            id: Some("bundle:starter".to_string()),
            type_id: "bundle_type:box".to_string(),
            title: "Starter Box".to_string(),
            slug: "starter-box".to_string(),
            enabled: true,
            sku: "STARTER".to_string(),
            price: Decimal::new(4999, 2),
            tax_category_id: None,
            shipping_category_id: None,
            post_date: None,
            expiry_date: None,
            purchasable_ids: Vec::new(),
            qtys: HashMap::new(),
            custom_fields: HashMap::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn line_item(qty: i64) -> LineItem {
        LineItem {
            id: Some("line:1".to_string()),
            order_id: None,
            purchasable_id: "bundle:starter".to_string(),
            qty,
            price: Decimal::new(4999, 2),
            snapshot: None,
        }
    }

    #[test]
    fn test_stock_is_min_over_constituents() {
        let constituents = vec![
            constituent("product:a", 2, StockLevel::Finite(10)),
            constituent("product:b", 3, StockLevel::Finite(9)),
        ];
        // min(floor(10/2)=5, floor(9/3)=3)
        assert_eq!(compute_available_stock(&constituents), 3);
    }

    #[test]
    fn test_empty_composition_has_zero_stock() {
        assert_eq!(compute_available_stock(&[]), 0);
        assert!(!has_stock(&[]));
    }

    #[test]
    fn test_unlimited_constituent_does_not_bottleneck() {
        let constituents = vec![
            constituent("product:a", 2, StockLevel::Finite(10)),
            constituent("product:b", 3, StockLevel::Unlimited),
        ];
        assert_eq!(compute_available_stock(&constituents), 5);
    }

    #[test]
    fn test_all_unlimited_is_sentinel() {
        let constituents = vec![constituent("product:a", 7, StockLevel::Unlimited)];
        assert_eq!(compute_available_stock(&constituents), UNLIMITED_STOCK);
        assert!(has_stock(&constituents));
    }

    #[test]
    fn test_exhausted_constituent_zeroes_stock() {
        let constituents = vec![
            constituent("product:a", 2, StockLevel::Finite(10)),
            constituent("product:b", 3, StockLevel::Finite(2)),
        ];
        assert_eq!(compute_available_stock(&constituents), 0);
        assert!(!has_stock(&constituents));
    }

    #[test]
    fn test_clamp_above_stock() {
        let b = bundle();
        let mut item = line_item(10);
        let errors = clamp_line_item(&b, 3, &mut item);

        assert_eq!(item.qty, 3);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0], "You reached the maximum stock of Bundle: Starter Box");
    }

    #[test]
    fn test_clamp_at_or_below_stock_is_untouched() {
        let b = bundle();

        let mut item = line_item(3);
        assert!(clamp_line_item(&b, 3, &mut item).is_empty());
        assert_eq!(item.qty, 3);

        let mut item = line_item(2);
        assert!(clamp_line_item(&b, 3, &mut item).is_empty());
        assert_eq!(item.qty, 2);
    }

    #[test]
    fn test_clamp_is_idempotent() {
        let b = bundle();
        let mut item = line_item(10);

        let first = clamp_line_item(&b, 3, &mut item);
        assert_eq!(first.len(), 1);

        let second = clamp_line_item(&b, 3, &mut item);
        assert!(second.is_empty());
        assert_eq!(item.qty, 3);
    }
}
