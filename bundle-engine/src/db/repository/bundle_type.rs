//! Bundle Type Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{BundleTypeRecord, BundleTypeSiteRecord};
use serde_json::Value;
use shared::models::{BundleType, BundleTypeSite};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "bundle_type";
const SITE_TABLE: &str = "bundle_type_site";

#[derive(Clone)]
pub struct BundleTypeRepository {
    base: BaseRepository,
}

impl BundleTypeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all bundle types ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<BundleType>> {
        let records: Vec<BundleTypeRecord> = self
            .base
            .db()
            .query("SELECT * FROM bundle_type ORDER BY name")
            .await?
            .take(0)?;

        let mut types = Vec::with_capacity(records.len());
        for record in records {
            let sites = match &record.id {
                Some(id) => self.find_site_rows(&id.to_string()).await?,
                None => Vec::new(),
            };
            types.push(record.into_bundle_type(sites));
        }
        Ok(types)
    }

    /// Find bundle type by id, with its site settings attached
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<BundleType>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let record: Option<BundleTypeRecord> = self.base.db().select((TABLE, pure_id)).await?;

        match record {
            Some(record) => {
                let full_id = format!("{TABLE}:{pure_id}");
                let sites = self.find_site_rows(&full_id).await?;
                Ok(Some(record.into_bundle_type(sites)))
            }
            None => Ok(None),
        }
    }

    /// Find bundle type by handle
    pub async fn find_by_handle(&self, handle: &str) -> RepoResult<Option<BundleType>> {
        let handle_owned = handle.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM bundle_type WHERE handle = $handle LIMIT 1")
            .bind(("handle", handle_owned))
            .await?;
        let records: Vec<BundleTypeRecord> = result.take(0)?;

        match records.into_iter().next() {
            Some(record) => {
                let sites = match &record.id {
                    Some(id) => self.find_site_rows(&id.to_string()).await?,
                    None => Vec::new(),
                };
                Ok(Some(record.into_bundle_type(sites)))
            }
            None => Ok(None),
        }
    }

    /// Insert a new bundle type row
    pub async fn create(&self, record: BundleTypeRecord) -> RepoResult<BundleTypeRecord> {
        if self.find_by_handle(&record.handle).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Bundle type '{}' already exists",
                record.handle
            )));
        }

        let created: Option<BundleTypeRecord> =
            self.base.db().create(TABLE).content(record).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create bundle type".to_string()))
    }

    /// Merge a partial update into a bundle type row
    pub async fn update(&self, id: &str, data: Value) -> RepoResult<BundleType> {
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
            .ok_or_else(|| RepoError::NotFound(format!("Bundle type {id} not found")))
    }

    /// Site settings rows for a bundle type
    pub async fn find_site_rows(&self, type_id: &str) -> RepoResult<Vec<BundleTypeSiteRecord>> {
        let type_owned = type_id.to_string();
        let rows: Vec<BundleTypeSiteRecord> = self
            .base
            .db()
            .query("SELECT * FROM bundle_type_site WHERE bundle_type = $bundle_type ORDER BY site_id")
            .bind(("bundle_type", type_owned))
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Reconcile site settings rows: delete existing rows, reinsert
    /// the full set.
    pub async fn sync_site_rows(
        &self,
        type_id: &str,
        sites: &[BundleTypeSite],
    ) -> RepoResult<()> {
        let type_owned = type_id.to_string();
        self.base
            .db()
            .query("DELETE bundle_type_site WHERE bundle_type = $bundle_type")
            .bind(("bundle_type", type_owned))
            .await?;

        for site in sites {
            let row = BundleTypeSiteRecord {
                id: None,
                bundle_type: type_id.to_string(),
                site_id: site.site_id.clone(),
                has_urls: site.has_urls,
                uri_format: site.uri_format.clone(),
                template: site.template.clone(),
            };
            let _: Option<BundleTypeSiteRecord> =
                self.base.db().create(SITE_TABLE).content(row).await?;
        }
        Ok(())
    }

    /// Hard delete a bundle type and its site settings rows
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let pure_id = strip_table_prefix(TABLE, id);
        let full_id = format!("{TABLE}:{pure_id}");

        self.base
            .db()
            .query("DELETE bundle_type_site WHERE bundle_type = $bundle_type")
            .bind(("bundle_type", full_id))
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
