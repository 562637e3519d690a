//! Bundle type service

use crate::db::models::BundleTypeRecord;
use crate::db::repository::{BundleRepository, BundleTypeRepository};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::bundle_type::validate_handle;
use shared::models::{BundleType, BundleTypeCreate, BundleTypeUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct BundleTypeService {
    types: BundleTypeRepository,
    bundles: BundleRepository,
}

impl BundleTypeService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            types: BundleTypeRepository::new(db.clone()),
            bundles: BundleRepository::new(db),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<BundleType>> {
        Ok(self.types.find_all().await?)
    }

    pub async fn get(&self, id: &str) -> AppResult<BundleType> {
        self.types.find_by_id(id).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::BundleTypeNotFound,
                format!("Bundle type {id} not found"),
            )
        })
    }

    pub async fn get_by_handle(&self, handle: &str) -> AppResult<BundleType> {
        self.types.find_by_handle(handle).await?.ok_or_else(|| {
            AppError::with_message(
                ErrorCode::BundleTypeNotFound,
                format!("Bundle type '{handle}' not found"),
            )
        })
    }

    pub async fn create(&self, data: BundleTypeCreate) -> AppResult<BundleType> {
        validate_handle(&data.handle)?;
        self.ensure_handle_free(&data.handle).await?;

        let record = BundleTypeRecord {
            id: None,
            name: data.name,
            handle: data.handle,
            sku_format: data.sku_format.unwrap_or_default(),
        };
        let created = self.types.create(record).await?;

        let type_id = created
            .id
            .as_ref()
            .map(|id| id.to_string())
            .ok_or_else(|| AppError::database("Bundle type created without id"))?;

        let sites = data.site_settings.unwrap_or_default();
        self.types.sync_site_rows(&type_id, &sites).await?;

        tracing::info!(handle = %created.handle, "Bundle type created");
        self.get(&type_id).await
    }

    pub async fn update(&self, id: &str, data: BundleTypeUpdate) -> AppResult<BundleType> {
        let existing = self.get(id).await?;

        if let Some(ref handle) = data.handle {
            validate_handle(handle)?;
            if handle != &existing.handle {
                self.ensure_handle_free(handle).await?;
            }
        }

        let mut patch = serde_json::Map::new();
        if let Some(name) = data.name {
            patch.insert("name".to_string(), name.into());
        }
        if let Some(handle) = data.handle {
            patch.insert("handle".to_string(), handle.into());
        }
        if let Some(sku_format) = data.sku_format {
            patch.insert("sku_format".to_string(), sku_format.into());
        }
        if !patch.is_empty() {
            self.types.update(id, patch.into()).await?;
        }

        if let Some(sites) = data.site_settings {
            let type_id = existing
                .id
                .as_deref()
                .ok_or_else(|| AppError::database("Bundle type row without id"))?;
            self.types.sync_site_rows(type_id, &sites).await?;
        }

        self.get(id).await
    }

    /// Delete a bundle type. Refused while bundles of the type exist.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let existing = self.get(id).await?;
        let type_id = existing
            .id
            .as_deref()
            .ok_or_else(|| AppError::database("Bundle type row without id"))?;

        let in_use = self.bundles.count_by_type(type_id).await?;
        if in_use > 0 {
            return Err(AppError::with_message(
                ErrorCode::BundleTypeInUse,
                format!(
                    "Bundle type '{}' still has {in_use} bundle(s)",
                    existing.handle
                ),
            )
            .with_detail("count", in_use));
        }

        self.types.delete(id).await?;
        tracing::info!(handle = %existing.handle, "Bundle type deleted");
        Ok(())
    }

    async fn ensure_handle_free(&self, handle: &str) -> AppResult<()> {
        if self.types.find_by_handle(handle).await?.is_some() {
            return Err(AppError::with_message(
                ErrorCode::BundleTypeHandleExists,
                format!("Bundle type '{handle}' already exists"),
            )
            .with_detail("handle", handle));
        }
        Ok(())
    }
}
