//! Tax and shipping category reference entities
//!
//! Referenced, never owned, by bundles.

use serde::{Deserialize, Serialize};

/// Tax category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCategory {
    pub id: Option<String>,
    pub name: String,
    pub handle: String,
    pub is_default: bool,
}

/// Shipping category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingCategory {
    pub id: Option<String>,
    pub name: String,
    pub handle: String,
    pub is_default: bool,
}
