//! Digital product fulfillment
//!
//! Digital products carry no physical stock; their fulfillment is
//! issuing one license per unit sold. The issuer itself (key
//! generation, delivery) belongs to the host.

use async_trait::async_trait;
use shared::error::AppResult;
use shared::models::{LineItem, Order};
use shared::purchasable::{Purchasable, StockCapability, UnitFulfillment};
use std::sync::Arc;

/// Creates one license for an order
#[async_trait]
pub trait LicenseIssuer: Send + Sync {
    async fn issue(&self, product_id: &str, order: &Order) -> AppResult<()>;
}

/// Per-unit fulfillment that issues a license for each unit
pub struct LicenseOnFulfill {
    product_id: String,
    issuer: Arc<dyn LicenseIssuer>,
}

impl LicenseOnFulfill {
    pub fn new(product_id: impl Into<String>, issuer: Arc<dyn LicenseIssuer>) -> Self {
        Self {
            product_id: product_id.into(),
            issuer,
        }
    }
}

#[async_trait]
impl UnitFulfillment for LicenseOnFulfill {
    async fn on_unit_fulfilled(&self, order: &Order) -> AppResult<()> {
        self.issuer.issue(&self.product_id, order).await?;
        tracing::debug!(product = %self.product_id, order = %order.number, "License issued");
        Ok(())
    }
}

/// A licensed digital product
pub struct DigitalProduct {
    id: String,
    title: String,
    license: LicenseOnFulfill,
}

impl DigitalProduct {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        issuer: Arc<dyn LicenseIssuer>,
    ) -> Self {
        let id = id.into();
        Self {
            license: LicenseOnFulfill::new(id.clone(), issuer),
            id,
            title: title.into(),
        }
    }
}

#[async_trait]
impl Purchasable for DigitalProduct {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> String {
        self.title.clone()
    }

    fn stock(&self) -> StockCapability {
        StockCapability::Unlimited
    }

    async fn after_order_complete(&self, _order: &Order, _line_item: &LineItem) -> AppResult<()> {
        // No stock to decrement; licensing happens per unit
        Ok(())
    }

    fn unit_fulfillment(&self) -> Option<&dyn UnitFulfillment> {
        Some(&self.license)
    }
}
