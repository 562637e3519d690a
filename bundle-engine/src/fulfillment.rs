//! Order completion fan-out
//!
//! When an order containing a bundle completes, every constituent gets
//! its own completion side effects as if it had been ordered directly,
//! at the bundle quantity scaled by its multiplier.

use crate::catalog::PurchasableResolver;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::events::BundleHooks;
use shared::models::{Bundle, LineItem, Order};
use std::sync::Arc;

pub struct FulfillmentDispatcher {
    resolver: Arc<dyn PurchasableResolver>,
    hooks: Arc<BundleHooks>,
}

impl FulfillmentDispatcher {
    pub fn new(resolver: Arc<dyn PurchasableResolver>, hooks: Arc<BundleHooks>) -> Self {
        Self { resolver, hooks }
    }

    /// Fan a completed bundle line item out to its constituents
    ///
    /// Constituents are processed in composition order. Each receives
    /// a derived line item carrying the original identity with the
    /// quantity scaled by its multiplier, then its per-unit
    /// fulfillment (if any) once per derived unit, then the completion
    /// hooks with the derived record. A failing constituent aborts the
    /// fan-out; earlier side effects are not rolled back.
    pub async fn on_order_complete(
        &self,
        bundle: &Bundle,
        order: &Order,
        line_item: &LineItem,
    ) -> AppResult<()> {
        for (purchasable_id, multiplier) in bundle.composition() {
            let purchasable = self
                .resolver
                .resolve(&purchasable_id)
                .await?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::PurchasableNotFound,
                        format!("Purchasable {purchasable_id} not found"),
                    )
                    .with_detail("purchasableId", purchasable_id.clone())
                })?;

            let derived = line_item.derived(purchasable.id(), multiplier);
            purchasable.after_order_complete(order, &derived).await?;

            if let Some(unit) = purchasable.unit_fulfillment() {
                for _ in 0..derived.qty {
                    unit.on_unit_fulfilled(order).await?;
                }
            }

            self.hooks.fire_order_complete(bundle, order, &derived);

            tracing::debug!(
                purchasable = %purchasable_id,
                qty = derived.qty,
                order = %order.number,
                "Constituent fulfilled"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use shared::purchasable::{Purchasable, StockCapability, UnitFulfillment};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    struct RecordingProduct {
        id: String,
        fulfilled_qty: AtomicI64,
        calls: AtomicUsize,
        unit: Option<UnitCounter>,
        fail: bool,
    }

    struct UnitCounter {
        units: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl UnitFulfillment for UnitCounter {
        async fn on_unit_fulfilled(&self, _order: &Order) -> AppResult<()> {
            self.units.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[async_trait]
    impl Purchasable for RecordingProduct {
        fn id(&self) -> &str {
            &self.id
        }

        fn description(&self) -> String {
            self.id.clone()
        }

        fn stock(&self) -> StockCapability {
            StockCapability::Unlimited
        }

        async fn after_order_complete(&self, _order: &Order, item: &LineItem) -> AppResult<()> {
            if self.fail {
                return Err(AppError::internal("stock decrement failed"));
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.fulfilled_qty.store(item.qty, Ordering::SeqCst);
            Ok(())
        }

        fn unit_fulfillment(&self) -> Option<&dyn UnitFulfillment> {
            self.unit.as_ref().map(|u| u as &dyn UnitFulfillment)
        }
    }

    fn product(id: &str) -> Arc<RecordingProduct> {
        Arc::new(RecordingProduct {
            id: id.to_string(),
            fulfilled_qty: AtomicI64::new(0),
            calls: AtomicUsize::new(0),
            unit: None,
            fail: false,
        })
    }

    fn bundle(composition: &[(&str, i64)]) -> Bundle {
        let mut b = Bundle {
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
        };
        b.set_purchasable_ids(composition.iter().map(|(id, _)| id.to_string()).collect());
        b.set_qtys(
            composition
                .iter()
                .map(|(id, qty)| (id.to_string(), *qty))
                .collect(),
        );
        b
    }

    fn order() -> Order {
        Order {
            id: Some("order:1".to_string()),
            number: "0001".to_string(),
            completed_at: Some(1_700_000_000_000),
        }
    }

    fn line_item(qty: i64) -> LineItem {
        LineItem {
            id: Some("line:1".to_string()),
            order_id: Some("order:1".to_string()),
            purchasable_id: "bundle:starter".to_string(),
            qty,
            price: Decimal::new(4999, 2),
            snapshot: None,
        }
    }

    #[tokio::test]
    async fn test_fan_out_scales_quantities() {
        let a = product("product:a");
        let b = product("product:b");
        let mut catalog = InMemoryCatalog::new();
        catalog.register(a.clone());
        catalog.register(b.clone());

        let dispatcher =
            FulfillmentDispatcher::new(Arc::new(catalog), Arc::new(BundleHooks::new()));
        let bundle = bundle(&[("product:a", 2), ("product:b", 1)]);

        dispatcher
            .on_order_complete(&bundle, &order(), &line_item(4))
            .await
            .unwrap();

        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.fulfilled_qty.load(Ordering::SeqCst), 8);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.fulfilled_qty.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_unit_fulfillment_fires_once_per_derived_unit() {
        let units = Arc::new(AtomicUsize::new(0));
        let digital = Arc::new(RecordingProduct {
            id: "product:ebook".to_string(),
            fulfilled_qty: AtomicI64::new(0),
            calls: AtomicUsize::new(0),
            unit: Some(UnitCounter {
                units: Arc::clone(&units),
            }),
            fail: false,
        });
        let mut catalog = InMemoryCatalog::new();
        catalog.register(digital);

        let dispatcher =
            FulfillmentDispatcher::new(Arc::new(catalog), Arc::new(BundleHooks::new()));
        let bundle = bundle(&[("product:ebook", 2)]);

        dispatcher
            .on_order_complete(&bundle, &order(), &line_item(4))
            .await
            .unwrap();

        assert_eq!(units.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_missing_constituent_aborts() {
        let a = product("product:a");
        let mut catalog = InMemoryCatalog::new();
        catalog.register(a);

        let dispatcher =
            FulfillmentDispatcher::new(Arc::new(catalog), Arc::new(BundleHooks::new()));
        let bundle = bundle(&[("product:a", 1), ("product:gone", 1)]);

        let err = dispatcher
            .on_order_complete(&bundle, &order(), &line_item(1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PurchasableNotFound);
    }

    #[tokio::test]
    async fn test_failing_constituent_stops_fan_out_and_skips_hooks() {
        let a = Arc::new(RecordingProduct {
            id: "product:a".to_string(),
            fulfilled_qty: AtomicI64::new(0),
            calls: AtomicUsize::new(0),
            unit: None,
            fail: true,
        });
        let b = product("product:b");
        let mut catalog = InMemoryCatalog::new();
        catalog.register(a);
        catalog.register(b.clone());

        let fired = Arc::new(Mutex::new(false));
        let fired_flag = Arc::clone(&fired);
        let mut hooks = BundleHooks::new();
        hooks.on_order_complete(move |_, _, _| {
            *fired_flag.lock().unwrap() = true;
        });

        let dispatcher = FulfillmentDispatcher::new(Arc::new(catalog), Arc::new(hooks));
        let bundle = bundle(&[("product:a", 1), ("product:b", 1)]);

        let result = dispatcher
            .on_order_complete(&bundle, &order(), &line_item(1))
            .await;
        assert!(result.is_err());
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
        assert!(!*fired.lock().unwrap());
    }

    #[tokio::test]
    async fn test_order_complete_hook_fires_per_constituent_with_derived_record() {
        let a = product("product:a");
        let b = product("product:b");
        let mut catalog = InMemoryCatalog::new();
        catalog.register(a);
        catalog.register(b);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_sink = Arc::clone(&seen);
        let mut hooks = BundleHooks::new();
        hooks.on_order_complete(move |_, _, item| {
            seen_sink
                .lock()
                .unwrap()
                .push((item.purchasable_id.clone(), item.qty));
        });

        let dispatcher = FulfillmentDispatcher::new(Arc::new(catalog), Arc::new(hooks));
        let bundle = bundle(&[("product:a", 2), ("product:b", 1)]);

        dispatcher
            .on_order_complete(&bundle, &order(), &line_item(2))
            .await
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ("product:a".to_string(), 4),
                ("product:b".to_string(), 2)
            ]
        );
    }
}
