//! Bundle Model
//!
//! A bundle is a purchasable composed of other purchasables in fixed
//! per-unit quantities. Its sellable stock is derived from its
//! constituents (see [`crate::stock`]).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Bundle status derived from the enabled flag and the availability window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BundleStatus {
    Live,
    Pending,
    Expired,
    Disabled,
}

impl BundleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Pending => "pending",
            Self::Expired => "expired",
            Self::Disabled => "disabled",
        }
    }
}

/// Bundle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub id: Option<String>,
    /// Bundle type reference (String ID, required)
    pub type_id: String,
    pub title: String,
    pub slug: String,
    pub enabled: bool,
    /// Generated from the type's SKU format when left blank on save
    pub sku: String,
    pub price: Decimal,
    pub tax_category_id: Option<String>,
    pub shipping_category_id: Option<String>,
    /// Availability window start (epoch millis)
    pub post_date: Option<i64>,
    /// Availability window end (epoch millis)
    pub expiry_date: Option<i64>,
    /// Constituent purchasable references, ordered, unique
    #[serde(default)]
    pub purchasable_ids: Vec<String>,
    /// Per-constituent quantity multipliers, keyed by purchasable id
    #[serde(default)]
    pub qtys: HashMap<String, i64>,
    /// Custom field values captured into order snapshots
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_fields: HashMap<String, Value>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Bundle {
    /// Compute the status at the given instant (epoch millis)
    ///
    /// - live: enabled, post date reached, expiry (if any) in the future
    /// - pending: enabled, post date in the future
    /// - expired: enabled, post date reached, expiry reached
    /// - disabled: not enabled
    ///
    /// An enabled bundle with no post date counts as live; the save path
    /// defaults the post date before the bundle is ever persisted.
    pub fn status(&self, now: i64) -> BundleStatus {
        if !self.enabled {
            return BundleStatus::Disabled;
        }

        let Some(post_date) = self.post_date else {
            return BundleStatus::Live;
        };

        if post_date > now {
            return BundleStatus::Pending;
        }

        match self.expiry_date {
            Some(expiry) if expiry <= now => BundleStatus::Expired,
            _ => BundleStatus::Live,
        }
    }

    /// Whether the bundle can currently be purchased
    pub fn is_available(&self, now: i64) -> bool {
        self.status(now) == BundleStatus::Live
    }

    /// Line-item facing description
    pub fn description(&self) -> String {
        format!("Bundle: {}", self.title)
    }

    /// Replace the constituent id set, de-duplicating while preserving
    /// first-occurrence order. The same purchasable cannot appear twice
    /// with different multipliers.
    pub fn set_purchasable_ids(&mut self, ids: Vec<String>) {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        self.purchasable_ids = unique;
    }

    /// Replace the quantity map wholesale
    pub fn set_qtys(&mut self, qtys: HashMap<String, i64>) {
        self.qtys = qtys;
    }

    /// Quantity multiplier for a constituent, defaulting to 1
    pub fn qty_for(&self, purchasable_id: &str) -> i64 {
        self.qtys.get(purchasable_id).copied().unwrap_or(1)
    }

    /// Ordered (purchasable id, qty) pairs of the composition
    pub fn composition(&self) -> Vec<(String, i64)> {
        self.purchasable_ids
            .iter()
            .map(|id| (id.clone(), self.qty_for(id)))
            .collect()
    }
}

/// Create bundle payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleCreate {
    pub type_id: String,
    pub title: String,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub price: Decimal,
    pub tax_category_id: Option<String>,
    pub shipping_category_id: Option<String>,
    pub post_date: Option<i64>,
    pub expiry_date: Option<i64>,
    pub enabled: Option<bool>,
    pub purchasable_ids: Vec<String>,
    pub qtys: HashMap<String, i64>,
    pub custom_fields: Option<HashMap<String, Value>>,
}

/// Update bundle payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub sku: Option<String>,
    pub price: Option<Decimal>,
    pub tax_category_id: Option<String>,
    pub shipping_category_id: Option<String>,
    pub post_date: Option<i64>,
    pub expiry_date: Option<i64>,
    pub enabled: Option<bool>,
    pub purchasable_ids: Option<Vec<String>>,
    pub qtys: Option<HashMap<String, i64>>,
    pub custom_fields: Option<HashMap<String, Value>>,
}
