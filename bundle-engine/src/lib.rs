//! Bundle engine
//!
//! Persistence, catalog resolution, lifecycle services and
//! order-completion fan-out for bundle products. Domain types live in
//! the `shared` crate.

pub mod catalog;
pub mod db;
pub mod digital;
pub mod fulfillment;
pub mod services;

pub use catalog::{InMemoryCatalog, PurchasableResolver};
pub use fulfillment::FulfillmentDispatcher;
pub use services::{BundleService, BundleTypeService};
