//! Tax and Shipping Category Repositories

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{ShippingCategoryRecord, TaxCategoryRecord};
use shared::models::{ShippingCategory, TaxCategory};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TAX_TABLE: &str = "tax_category";
const SHIPPING_TABLE: &str = "shipping_category";

#[derive(Clone)]
pub struct TaxCategoryRepository {
    base: BaseRepository,
}

impl TaxCategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<TaxCategory>> {
        let records: Vec<TaxCategoryRecord> = self
            .base
            .db()
            .query("SELECT * FROM tax_category ORDER BY name")
            .await?
            .take(0)?;
        Ok(records.into_iter().map(TaxCategory::from).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<TaxCategory>> {
        let pure_id = strip_table_prefix(TAX_TABLE, id);
        let record: Option<TaxCategoryRecord> =
            self.base.db().select((TAX_TABLE, pure_id)).await?;
        Ok(record.map(TaxCategory::from))
    }

    /// The category used when a bundle does not name one
    pub async fn find_default(&self) -> RepoResult<Option<TaxCategory>> {
        let records: Vec<TaxCategoryRecord> = self
            .base
            .db()
            .query("SELECT * FROM tax_category WHERE is_default = true LIMIT 1")
            .await?
            .take(0)?;
        Ok(records.into_iter().next().map(TaxCategory::from))
    }

    pub async fn create(&self, record: TaxCategoryRecord) -> RepoResult<TaxCategory> {
        let created: Option<TaxCategoryRecord> =
            self.base.db().create(TAX_TABLE).content(record).await?;
        created
            .map(TaxCategory::from)
            .ok_or_else(|| RepoError::Database("Failed to create tax category".to_string()))
    }
}

#[derive(Clone)]
pub struct ShippingCategoryRepository {
    base: BaseRepository,
}

impl ShippingCategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<ShippingCategory>> {
        let records: Vec<ShippingCategoryRecord> = self
            .base
            .db()
            .query("SELECT * FROM shipping_category ORDER BY name")
            .await?
            .take(0)?;
        Ok(records.into_iter().map(ShippingCategory::from).collect())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<ShippingCategory>> {
        let pure_id = strip_table_prefix(SHIPPING_TABLE, id);
        let record: Option<ShippingCategoryRecord> =
            self.base.db().select((SHIPPING_TABLE, pure_id)).await?;
        Ok(record.map(ShippingCategory::from))
    }

    /// The category used when a bundle does not name one
    pub async fn find_default(&self) -> RepoResult<Option<ShippingCategory>> {
        let records: Vec<ShippingCategoryRecord> = self
            .base
            .db()
            .query("SELECT * FROM shipping_category WHERE is_default = true LIMIT 1")
            .await?
            .take(0)?;
        Ok(records.into_iter().next().map(ShippingCategory::from))
    }

    pub async fn create(&self, record: ShippingCategoryRecord) -> RepoResult<ShippingCategory> {
        let created: Option<ShippingCategoryRecord> =
            self.base.db().create(SHIPPING_TABLE).content(record).await?;
        created
            .map(ShippingCategory::from)
            .ok_or_else(|| RepoError::Database("Failed to create shipping category".to_string()))
    }
}
