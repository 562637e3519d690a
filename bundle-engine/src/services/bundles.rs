//! Bundle service
//!
//! Lifecycle, composition resolution, derived stock and cart
//! population for bundles. The host's purchasable catalog and
//! lifecycle hooks are injected at construction.

use crate::catalog::PurchasableResolver;
use crate::db::models::BundleRecord;
use crate::db::repository::{
    BundleRepository, BundleTypeRepository, ShippingCategoryRepository, TaxCategoryRepository,
};
use crate::services::sku::render_sku_format;
use rust_decimal::Decimal;
use serde_json::Value;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::events::BundleHooks;
use shared::models::{Bundle, BundleCreate, BundleType, BundleUpdate, LineItem, ShippingCategory, TaxCategory};
use shared::purchasable::StockCapability;
use shared::snapshot::capture_snapshot;
use shared::stock::{self, ResolvedConstituent, StockLevel};
use std::collections::HashMap;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Cart-side sink for non-fatal population messages
pub trait CartSession {
    fn add_errors(&mut self, messages: Vec<String>);
}

#[derive(Clone)]
pub struct BundleService {
    bundles: BundleRepository,
    types: BundleTypeRepository,
    tax: TaxCategoryRepository,
    shipping: ShippingCategoryRepository,
    resolver: Arc<dyn PurchasableResolver>,
    hooks: Arc<BundleHooks>,
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

impl BundleService {
    pub fn new(
        db: Surreal<Db>,
        resolver: Arc<dyn PurchasableResolver>,
        hooks: Arc<BundleHooks>,
    ) -> Self {
        Self {
            bundles: BundleRepository::new(db.clone()),
            types: BundleTypeRepository::new(db.clone()),
            tax: TaxCategoryRepository::new(db.clone()),
            shipping: ShippingCategoryRepository::new(db),
            resolver,
            hooks,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Bundle>> {
        Ok(self.bundles.find_all().await?)
    }

    pub async fn list_by_type(&self, type_id: &str) -> AppResult<Vec<Bundle>> {
        Ok(self.bundles.find_by_type(type_id).await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<Bundle> {
        self.bundles.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(ErrorCode::BundleNotFound, format!("Bundle {id} not found"))
        })
    }

    pub async fn create(&self, data: BundleCreate) -> AppResult<Bundle> {
        validate_create(&data)?;

        let bundle_type = self.require_type(&data.type_id).await?;
        let enabled = data.enabled.unwrap_or(true);

        // An enabled bundle always gets a concrete window start
        let post_date = match data.post_date {
            Some(post_date) => Some(post_date),
            None if enabled => Some(now_millis()),
            None => None,
        };

        let now = now_millis();
        let record = BundleRecord {
            id: None,
            type_id: data.type_id.clone(),
            title: data.title.clone(),
            slug: data.slug.unwrap_or_else(|| slugify(&data.title)),
            enabled,
            sku: data.sku.clone().unwrap_or_default(),
            price: data.price,
            tax_category_id: data.tax_category_id,
            shipping_category_id: data.shipping_category_id,
            post_date,
            expiry_date: data.expiry_date,
            custom_fields: data.custom_fields.unwrap_or_default(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        let created = self.bundles.create(record).await?;
        let bundle_id = created
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::database("Bundle created without id"))?;

        let composition = dedup_composition(data.purchasable_ids, &data.qtys);
        self.bundles
            .sync_purchasable_rows(&bundle_id, &composition)
            .await?;

        let mut bundle = self.get(&bundle_id).await?;
        if bundle.sku.is_empty() {
            let sku = self.generate_sku(&bundle_type, &bundle);
            self.bundles.update_sku(&bundle_id, &sku).await?;
            bundle.sku = sku;
        }

        tracing::info!(id = %bundle_id, title = %bundle.title, "Bundle created");
        Ok(bundle)
    }

    pub async fn update(&self, id: &str, data: BundleUpdate) -> AppResult<Bundle> {
        validate_update(&data)?;
        let existing = self.get(id).await?;
        let bundle_id = existing
            .id
            .clone()
            .ok_or_else(|| AppError::database("Bundle row without id"))?;

        let mut patch = serde_json::Map::new();
        if let Some(title) = data.title {
            patch.insert("title".to_string(), title.into());
        }
        if let Some(slug) = data.slug {
            patch.insert("slug".to_string(), slug.into());
        }
        if let Some(sku) = data.sku {
            patch.insert("sku".to_string(), sku.into());
        }
        if let Some(price) = data.price {
            patch.insert("price".to_string(), serde_json::to_value(price).unwrap_or(Value::Null));
        }
        if let Some(tax) = data.tax_category_id {
            patch.insert("tax_category_id".to_string(), tax.into());
        }
        if let Some(shipping) = data.shipping_category_id {
            patch.insert("shipping_category_id".to_string(), shipping.into());
        }
        if let Some(post_date) = data.post_date {
            patch.insert("post_date".to_string(), post_date.into());
        }
        if let Some(expiry_date) = data.expiry_date {
            patch.insert("expiry_date".to_string(), expiry_date.into());
        }
        if let Some(enabled) = data.enabled {
            patch.insert("enabled".to_string(), enabled.into());
            // Enabling a bundle that never had a window start sets one
            if enabled && existing.post_date.is_none() && !patch.contains_key("post_date") {
                patch.insert("post_date".to_string(), now_millis().into());
            }
        }
        if let Some(custom_fields) = data.custom_fields {
            patch.insert(
                "custom_fields".to_string(),
                serde_json::to_value(custom_fields).unwrap_or(Value::Null),
            );
        }
        if !patch.is_empty() {
            patch.insert("updated_at".to_string(), now_millis().into());
            self.bundles.update(&bundle_id, patch.into()).await?;
        }

        if data.purchasable_ids.is_some() || data.qtys.is_some() {
            let ids = data
                .purchasable_ids
                .unwrap_or_else(|| existing.purchasable_ids.clone());
            let qtys = data.qtys.unwrap_or_else(|| existing.qtys.clone());
            let composition = dedup_composition(ids, &qtys);
            self.bundles
                .sync_purchasable_rows(&bundle_id, &composition)
                .await?;
        }

        let mut bundle = self.get(&bundle_id).await?;
        if bundle.sku.is_empty() {
            let bundle_type = self.require_type(&bundle.type_id).await?;
            let sku = self.generate_sku(&bundle_type, &bundle);
            self.bundles.update_sku(&bundle_id, &sku).await?;
            bundle.sku = sku;
        }
        Ok(bundle)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let existing = self.get(id).await?;
        self.bundles.delete(id).await?;
        tracing::info!(id = ?existing.id, "Bundle deleted");
        Ok(())
    }

    /// Resolve the composition against the live catalog
    ///
    /// Every constituent must resolve; stock capabilities collapse to
    /// concrete levels here, querying live quantities once.
    pub async fn resolve_composition(
        &self,
        bundle: &Bundle,
    ) -> AppResult<Vec<ResolvedConstituent>> {
        let mut constituents = Vec::with_capacity(bundle.purchasable_ids.len());
        for (purchasable_id, qty) in bundle.composition() {
            let purchasable =
                self.resolver
                    .resolve(&purchasable_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::with_message(
                            ErrorCode::PurchasableNotFound,
                            format!("Purchasable {purchasable_id} not found"),
                        )
                        .with_detail("purchasableId", purchasable_id.clone())
                    })?;

            let available = match purchasable.stock() {
                StockCapability::Unlimited => StockLevel::Unlimited,
                StockCapability::Finite(n) => StockLevel::Finite(n),
                StockCapability::Queryable => {
                    StockLevel::Finite(purchasable.available_quantity().await?)
                }
            };

            constituents.push(ResolvedConstituent {
                purchasable,
                qty,
                available,
            });
        }
        Ok(constituents)
    }

    /// Derived sellable stock of a bundle
    pub async fn available_stock(&self, bundle: &Bundle) -> AppResult<i64> {
        let constituents = self.resolve_composition(bundle).await?;
        Ok(stock::compute_available_stock(&constituents))
    }

    pub async fn has_stock(&self, bundle: &Bundle) -> AppResult<bool> {
        Ok(self.available_stock(bundle).await? > 0)
    }

    /// Prepare a cart line item for a bundle
    ///
    /// Clamps the quantity to derived stock (reporting the clamp on
    /// the session) and captures the snapshot. The stock read here is
    /// advisory; nothing reserves constituent stock until the order
    /// completes.
    pub async fn populate_line_item(
        &self,
        bundle: &Bundle,
        line_item: &mut LineItem,
        session: &mut dyn CartSession,
    ) -> AppResult<()> {
        let available = self.available_stock(bundle).await?;
        let errors = stock::clamp_line_item(bundle, available, line_item);
        if !errors.is_empty() {
            session.add_errors(errors);
        }

        line_item.price = bundle.price;
        line_item.snapshot = Some(Value::Object(capture_snapshot(bundle, &self.hooks)));
        Ok(())
    }

    /// Tax category of a bundle, falling back to the store default
    pub async fn tax_category(&self, bundle: &Bundle) -> AppResult<TaxCategory> {
        if let Some(ref id) = bundle.tax_category_id
            && let Some(category) = self.tax.find_by_id(id).await?
        {
            return Ok(category);
        }
        self.tax.find_default().await?.ok_or_else(|| {
            AppError::new(ErrorCode::TaxCategoryNotFound)
        })
    }

    /// Shipping category of a bundle, falling back to the store default
    pub async fn shipping_category(&self, bundle: &Bundle) -> AppResult<ShippingCategory> {
        if let Some(ref id) = bundle.shipping_category_id
            && let Some(category) = self.shipping.find_by_id(id).await?
        {
            return Ok(category);
        }
        self.shipping.find_default().await?.ok_or_else(|| {
            AppError::new(ErrorCode::ShippingCategoryNotFound)
        })
    }

    /// URI format for a bundle on a site, via its type's site settings
    pub async fn uri_format(&self, bundle: &Bundle, site_id: &str) -> AppResult<Option<String>> {
        let bundle_type = self.require_type(&bundle.type_id).await?;
        bundle_type.uri_format(site_id)
    }

    async fn require_type(&self, type_id: &str) -> AppResult<BundleType> {
        self.types.find_by_id(type_id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::BundleTypeNotFound,
                format!("Bundle type {type_id} not found"),
            )
        })
    }

    /// Render the type's SKU format against a saved bundle
    ///
    /// A format that fails to render leaves the SKU empty rather than
    /// failing the save; the warning is the only trace.
    fn generate_sku(&self, bundle_type: &BundleType, bundle: &Bundle) -> String {
        match render_sku_format(bundle_type, bundle) {
            Ok(sku) => sku,
            Err(e) => {
                tracing::warn!(
                    bundle = ?bundle.id,
                    error = %e,
                    "SKU format render failed, storing empty SKU"
                );
                String::new()
            }
        }
    }
}

fn dedup_composition(ids: Vec<String>, qtys: &HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut unique: Vec<(String, i64)> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.iter().any(|(existing, _)| existing == &id) {
            let qty = qtys.get(&id).copied().unwrap_or(1);
            unique.push((id, qty));
        }
    }
    unique
}

fn validate_create(data: &BundleCreate) -> AppResult<()> {
    let mut err = AppError::validation("Bundle validation failed");
    let mut failed = false;

    if data.title.trim().is_empty() {
        err = err.with_detail("title", "required");
        failed = true;
    }
    if data.type_id.trim().is_empty() {
        err = err.with_detail("typeId", "required");
        failed = true;
    }
    if data.price < Decimal::ZERO {
        err = err.with_detail("price", "must not be negative");
        failed = true;
    }
    if data.purchasable_ids.is_empty() {
        err = err.with_detail("purchasableIds", "required");
        failed = true;
    }
    for (purchasable_id, qty) in &data.qtys {
        if *qty < 1 {
            err = err.with_detail(purchasable_id.clone(), "qty must be at least 1");
            failed = true;
        }
    }

    if failed { Err(err) } else { Ok(()) }
}

fn validate_update(data: &BundleUpdate) -> AppResult<()> {
    let mut err = AppError::validation("Bundle validation failed");
    let mut failed = false;

    if let Some(ref title) = data.title
        && title.trim().is_empty()
    {
        err = err.with_detail("title", "required");
        failed = true;
    }
    if let Some(price) = data.price
        && price < Decimal::ZERO
    {
        err = err.with_detail("price", "must not be negative");
        failed = true;
    }
    if let Some(ref ids) = data.purchasable_ids
        && ids.is_empty()
    {
        err = err.with_detail("purchasableIds", "required");
        failed = true;
    }
    if let Some(ref qtys) = data.qtys {
        for (purchasable_id, qty) in qtys {
            if *qty < 1 {
                err = err.with_detail(purchasable_id.clone(), "qty must be at least 1");
                failed = true;
            }
        }
    }

    if failed { Err(err) } else { Ok(()) }
}
