//! Bundle lifecycle hooks
//!
//! Host systems subscribe to typed callback lists instead of pattern
//! matching on a shared event bus. Every list defaults to empty, in
//! which case firing it is a no-op.

use crate::models::{Bundle, LineItem, Order};
use serde_json::{Map, Value};

/// Callback deciding which custom field handles enter a snapshot
pub type SnapshotFieldsFn = dyn Fn(&Bundle, &mut Vec<String>) + Send + Sync;

/// Callback amending the captured field data before the merge
pub type SnapshotDataFn = dyn Fn(&Bundle, &mut Map<String, Value>) + Send + Sync;

/// Callback observing a completed order containing the bundle
pub type OrderCompleteFn = dyn Fn(&Bundle, &Order, &LineItem) + Send + Sync;

/// Subscriber lists for the bundle lifecycle
#[derive(Default)]
pub struct BundleHooks {
    before_snapshot: Vec<Box<SnapshotFieldsFn>>,
    after_snapshot: Vec<Box<SnapshotDataFn>>,
    order_complete: Vec<Box<OrderCompleteFn>>,
}

impl BundleHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to snapshot field selection
    pub fn on_before_snapshot<F>(&mut self, hook: F)
    where
        F: Fn(&Bundle, &mut Vec<String>) + Send + Sync + 'static,
    {
        self.before_snapshot.push(Box::new(hook));
    }

    /// Subscribe to snapshot data capture
    pub fn on_after_snapshot<F>(&mut self, hook: F)
    where
        F: Fn(&Bundle, &mut Map<String, Value>) + Send + Sync + 'static,
    {
        self.after_snapshot.push(Box::new(hook));
    }

    /// Subscribe to bundle order completion
    pub fn on_order_complete<F>(&mut self, hook: F)
    where
        F: Fn(&Bundle, &Order, &LineItem) + Send + Sync + 'static,
    {
        self.order_complete.push(Box::new(hook));
    }

    pub fn fire_before_snapshot(&self, bundle: &Bundle, fields: &mut Vec<String>) {
        for hook in &self.before_snapshot {
            hook(bundle, fields);
        }
    }

    pub fn fire_after_snapshot(&self, bundle: &Bundle, field_data: &mut Map<String, Value>) {
        for hook in &self.after_snapshot {
            hook(bundle, field_data);
        }
    }

    pub fn fire_order_complete(&self, bundle: &Bundle, order: &Order, line_item: &LineItem) {
        for hook in &self.order_complete {
            hook(bundle, order, line_item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

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

    #[test]
    fn test_empty_hooks_are_noops() {
        let hooks = BundleHooks::new();
        let b = bundle();
        let mut fields = vec!["color".to_string()];
        hooks.fire_before_snapshot(&b, &mut fields);
        assert_eq!(fields, vec!["color".to_string()]);
    }

    #[test]
    fn test_all_subscribers_fire_in_order() {
        let mut hooks = BundleHooks::new();
        hooks.on_before_snapshot(|_, fields| fields.push("first".to_string()));
        hooks.on_before_snapshot(|_, fields| fields.push("second".to_string()));

        let mut fields = Vec::new();
        hooks.fire_before_snapshot(&bundle(), &mut fields);
        assert_eq!(fields, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_order_complete_subscribers_observe() {
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);

        let mut hooks = BundleHooks::new();
        hooks.on_order_complete(move |_, _, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let order = Order {
            id: Some("order:1".to_string()),
            number: "0001".to_string(),
            completed_at: Some(1_700_000_000_000),
        };
        let item = LineItem {
            id: Some("line:1".to_string()),
            order_id: Some("order:1".to_string()),
            purchasable_id: "bundle:starter".to_string(),
            qty: 1,
            price: Decimal::ZERO,
            snapshot: None,
        };

        hooks.fire_order_complete(&bundle(), &order, &item);
        hooks.fire_order_complete(&bundle(), &order, &item);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
