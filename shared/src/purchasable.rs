//! Purchasable trait and stock capabilities
//!
//! Constituents declare their stock model up front instead of being
//! probed per call; the engine resolves `Queryable` quantities once
//! at composition-load time.

use crate::error::AppResult;
use crate::models::{LineItem, Order};
use async_trait::async_trait;

/// How a purchasable tracks stock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCapability {
    /// No stock concept; never a bottleneck
    Unlimited,
    /// Plain stock counter
    Finite(i64),
    /// Quantity answered live via [`Purchasable::available_quantity`]
    Queryable,
}

/// Anything with its own identity, price and fulfillment behavior that
/// can be a bundle constituent or be sold standalone.
#[async_trait]
pub trait Purchasable: Send + Sync {
    /// Stable element id, e.g. `"product:abc"`
    fn id(&self) -> &str;

    /// Human-readable description used in cart messages
    fn description(&self) -> String;

    /// Stock model of this purchasable
    fn stock(&self) -> StockCapability;

    /// Live available quantity; only consulted for
    /// [`StockCapability::Queryable`] purchasables.
    async fn available_quantity(&self) -> AppResult<i64> {
        Ok(0)
    }

    /// Apply order-completion side effects (stock decrement etc.) for
    /// the given fulfillment record.
    async fn after_order_complete(&self, order: &Order, line_item: &LineItem) -> AppResult<()>;

    /// Optional per-unit side effect invoked exactly once per derived
    /// unit at fulfillment time (digital license issuance registers
    /// here).
    fn unit_fulfillment(&self) -> Option<&dyn UnitFulfillment> {
        None
    }
}

/// Per-unit fulfillment side effect
#[async_trait]
pub trait UnitFulfillment: Send + Sync {
    async fn on_unit_fulfilled(&self, order: &Order) -> AppResult<()>;
}
