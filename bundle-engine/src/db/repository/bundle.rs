//! Bundle Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{BundlePurchasableRecord, BundleRecord};
use serde_json::Value;
use shared::models::Bundle;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "bundle";
const COMPOSITION_TABLE: &str = "bundle_purchasable";

#[derive(Clone)]
pub struct BundleRepository {
    base: BaseRepository,
}

impl BundleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all bundles ordered by title
    pub async fn find_all(&self) -> RepoResult<Vec<Bundle>> {
        let records: Vec<BundleRecord> = self
            .base
            .db()
            .query("SELECT * FROM bundle ORDER BY title")
            .await?
            .take(0)?;

        let mut bundles = Vec::with_capacity(records.len());
        for record in records {
            let rows = match &record.id {
                Some(id) => self.find_purchasable_rows(&id.to_string()).await?,
                None => Vec::new(),
            };
            bundles.push(record.into_bundle(rows));
        }
        Ok(bundles)
    }

    /// Find bundle by id, with its composition attached
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Bundle>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let record: Option<BundleRecord> = self.base.db().select((TABLE, pure_id)).await?;

        match record {
            Some(record) => {
                let full_id = format!("{TABLE}:{pure_id}");
                let rows = self.find_purchasable_rows(&full_id).await?;
                Ok(Some(record.into_bundle(rows)))
            }
            None => Ok(None),
        }
    }

    /// Find all bundles of a type
    pub async fn find_by_type(&self, type_id: &str) -> RepoResult<Vec<Bundle>> {
        let type_id_owned = type_id.to_string();
        let records: Vec<BundleRecord> = self
            .base
            .db()
            .query("SELECT * FROM bundle WHERE type_id = $type_id ORDER BY title")
            .bind(("type_id", type_id_owned))
            .await?
            .take(0)?;

        let mut bundles = Vec::with_capacity(records.len());
        for record in records {
            let rows = match &record.id {
                Some(id) => self.find_purchasable_rows(&id.to_string()).await?,
                None => Vec::new(),
            };
            bundles.push(record.into_bundle(rows));
        }
        Ok(bundles)
    }

    /// Number of bundles referencing a type
    pub async fn count_by_type(&self, type_id: &str) -> RepoResult<i64> {
        let type_id_owned = type_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM bundle WHERE type_id = $type_id GROUP ALL")
            .bind(("type_id", type_id_owned))
            .await?;

        #[derive(serde::Deserialize)]
        struct CountRow {
            total: i64,
        }
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.total).unwrap_or(0))
    }

    /// Insert a new bundle row (composition rows are synced separately)
    pub async fn create(&self, record: BundleRecord) -> RepoResult<BundleRecord> {
        let created: Option<BundleRecord> = self.base.db().create(TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create bundle".to_string()))
    }

    /// Merge a partial update into a bundle row
    pub async fn update(&self, id: &str, data: Value) -> RepoResult<Bundle> {
        let pure_id = strip_table_prefix(TABLE, id);
        let thing = RecordId::from_table_key(TABLE, pure_id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(pure_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Bundle {id} not found")))
    }

    /// Overwrite a bundle's SKU
    pub async fn update_sku(&self, id: &str, sku: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(TABLE, id);
        let thing = RecordId::from_table_key(TABLE, pure_id);
        let sku_owned = sku.to_string();
        self.base
            .db()
            .query("UPDATE $thing SET sku = $sku")
            .bind(("thing", thing))
            .bind(("sku", sku_owned))
            .await?;
        Ok(())
    }

    /// Composition rows for a bundle, in their stored order
    pub async fn find_purchasable_rows(
        &self,
        bundle_id: &str,
    ) -> RepoResult<Vec<BundlePurchasableRecord>> {
        let bundle_owned = bundle_id.to_string();
        let rows: Vec<BundlePurchasableRecord> = self
            .base
            .db()
            .query("SELECT * FROM bundle_purchasable WHERE bundle = $bundle ORDER BY sort_order")
            .bind(("bundle", bundle_owned))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Reconcile composition rows: delete existing rows, reinsert the
    /// full set in order. `pairs` is `(purchasable_id, qty)`.
    pub async fn sync_purchasable_rows(
        &self,
        bundle_id: &str,
        pairs: &[(String, i64)],
    ) -> RepoResult<()> {
        let bundle_owned = bundle_id.to_string();
        self.base
            .db()
            .query("DELETE bundle_purchasable WHERE bundle = $bundle")
            .bind(("bundle", bundle_owned))
            .await?;

        for (sort_order, (purchasable_id, qty)) in pairs.iter().enumerate() {
            let row = BundlePurchasableRecord {
                id: None,
                bundle: bundle_id.to_string(),
                purchasable_id: purchasable_id.clone(),
                qty: *qty,
                sort_order: sort_order as i64,
            };
            let _: Option<BundlePurchasableRecord> =
                self.base.db().create(COMPOSITION_TABLE).content(row).await?;
        }
        Ok(())
    }

    /// Hard delete a bundle and its composition rows
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let full_id = format!("{TABLE}:{pure_id}");

        self.base
            .db()
            .query("DELETE bundle_purchasable WHERE bundle = $bundle")
            .bind(("bundle", full_id))
            .await?;

        let thing = RecordId::from_table_key(TABLE, pure_id);
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
