//! Storage records
//!
//! Row shapes as they live in SurrealDB. Compositions and site
//! settings are child rows reconciled on every write; the records
//! convert into the flat domain models from `shared`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::{Bundle, BundleType, BundleTypeSite, ShippingCategory, TaxCategory};
use std::collections::HashMap;
use surrealdb::RecordId;

fn id_string(id: &Option<RecordId>) -> Option<String> {
    id.as_ref().map(|r| r.to_string())
}

/// Bundle row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub type_id: String,
    pub title: String,
    pub slug: String,
    pub enabled: bool,
    pub sku: String,
    pub price: Decimal,
    pub tax_category_id: Option<String>,
    pub shipping_category_id: Option<String>,
    pub post_date: Option<i64>,
    pub expiry_date: Option<i64>,
    #[serde(default)]
    pub custom_fields: HashMap<String, Value>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl BundleRecord {
    /// Assemble the domain model from this row plus its composition rows
    pub fn into_bundle(self, rows: Vec<BundlePurchasableRecord>) -> Bundle {
        let mut purchasable_ids = Vec::with_capacity(rows.len());
        let mut qtys = HashMap::with_capacity(rows.len());
        for row in rows {
            purchasable_ids.push(row.purchasable_id.clone());
            qtys.insert(row.purchasable_id, row.qty);
        }

        Bundle {
            id: id_string(&self.id),
            type_id: self.type_id,
            title: self.title,
            slug: self.slug,
            enabled: self.enabled,
            sku: self.sku,
            price: self.price,
            tax_category_id: self.tax_category_id,
            shipping_category_id: self.shipping_category_id,
            post_date: self.post_date,
            expiry_date: self.expiry_date,
            purchasable_ids,
            qtys,
            custom_fields: self.custom_fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// One constituent of a bundle, ordered by `sort_order`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundlePurchasableRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning bundle id in `table:key` form
    pub bundle: String,
    pub purchasable_id: String,
    pub qty: i64,
    pub sort_order: i64,
}

/// Bundle type row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleTypeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub handle: String,
    pub sku_format: String,
}

impl BundleTypeRecord {
    pub fn into_bundle_type(self, sites: Vec<BundleTypeSiteRecord>) -> BundleType {
        BundleType {
            id: id_string(&self.id),
            name: self.name,
            handle: self.handle,
            sku_format: self.sku_format,
            site_settings: sites.into_iter().map(BundleTypeSiteRecord::into_site).collect(),
        }
    }
}

/// Per-site settings row for a bundle type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleTypeSiteRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning bundle type id in `table:key` form
    pub bundle_type: String,
    pub site_id: String,
    pub has_urls: bool,
    pub uri_format: Option<String>,
    pub template: Option<String>,
}

impl BundleTypeSiteRecord {
    pub fn into_site(self) -> BundleTypeSite {
        BundleTypeSite {
            site_id: self.site_id,
            has_urls: self.has_urls,
            uri_format: self.uri_format,
            template: self.template,
        }
    }
}

/// Tax category row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxCategoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub handle: String,
    pub is_default: bool,
}

impl From<TaxCategoryRecord> for TaxCategory {
    fn from(r: TaxCategoryRecord) -> Self {
        TaxCategory {
            id: id_string(&r.id),
            name: r.name,
            handle: r.handle,
            is_default: r.is_default,
        }
    }
}

/// Shipping category row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingCategoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    pub handle: String,
    pub is_default: bool,
}

impl From<ShippingCategoryRecord> for ShippingCategory {
    fn from(r: ShippingCategoryRecord) -> Self {
        ShippingCategory {
            id: id_string(&r.id),
            name: r.name,
            handle: r.handle,
            is_default: r.is_default,
        }
    }
}
