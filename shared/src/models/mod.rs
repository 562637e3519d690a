//! Domain models

pub mod bundle;
pub mod bundle_type;
pub mod category;
pub mod order;

pub use bundle::{Bundle, BundleCreate, BundleStatus, BundleUpdate};
pub use bundle_type::{BundleType, BundleTypeCreate, BundleTypeSite, BundleTypeUpdate};
pub use category::{ShippingCategory, TaxCategory};
pub use order::{LineItem, Order};
