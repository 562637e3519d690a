//! Service layer

pub mod bundle_types;
pub mod bundles;
pub mod sku;

pub use bundle_types::BundleTypeService;
pub use bundles::{BundleService, CartSession};
pub use sku::{SkuFormatError, render_sku_format};
