//! Shared types for the commerce-bundles workspace
//!
//! Domain models, error types, event hooks and the pure stock/snapshot
//! logic used by the bundle engine. Nothing in this crate touches a
//! database or the network.

pub mod error;
pub mod events;
pub mod models;
pub mod purchasable;
pub mod snapshot;
pub mod stock;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use events::BundleHooks;
pub use purchasable::{Purchasable, StockCapability, UnitFulfillment};
pub use stock::{ResolvedConstituent, StockLevel, UNLIMITED_STOCK};
