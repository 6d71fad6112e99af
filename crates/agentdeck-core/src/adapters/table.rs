//! Row-level backend: one serialized row per resource id.

use std::time::Duration;

use agentdeck_storage::ResourceTableStorage;
use agentdeck_traits::{
    AdapterError, AdapterResult, Resource, ResourceAdapter, ResourcePatch, sort_by_recency,
};
use async_trait::async_trait;
use tracing::debug;

use super::{run_blocking, storage_error};

/// Table-shaped adapter keyed by resource id.
///
/// Inserts, updates and deletes touch a single row; `list` returns rows
/// ordered by `updated_at` descending.
#[derive(Debug, Clone)]
pub struct TableAdapter {
    storage: ResourceTableStorage,
    timeout: Option<Duration>,
}

impl TableAdapter {
    pub fn new(storage: ResourceTableStorage) -> Self {
        Self {
            storage,
            timeout: None,
        }
    }

    /// Bound every call the store makes through this adapter.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl ResourceAdapter for TableAdapter {
    fn name(&self) -> &str {
        "table"
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn list(&self) -> AdapterResult<Vec<Resource>> {
        let storage = self.storage.clone();
        run_blocking(move || {
            let rows = storage.list_raw().map_err(storage_error)?;
            let mut resources = Vec::with_capacity(rows.len());
            for (_, bytes) in rows {
                resources.push(serde_json::from_slice::<Resource>(&bytes)?);
            }
            sort_by_recency(&mut resources);
            Ok(resources)
        })
        .await
    }

    async fn insert(&self, resource: &Resource) -> AdapterResult<()> {
        let storage = self.storage.clone();
        let id = resource.id.clone();
        let bytes = serde_json::to_vec(resource)?;
        let inserted = run_blocking(move || {
            storage.insert_new_raw(&id, &bytes).map_err(storage_error)
        })
        .await?;
        if !inserted {
            return Err(AdapterError::DuplicateKey(resource.id.clone()));
        }
        debug!(resource_id = %resource.id, "table insert");
        Ok(())
    }

    async fn update(&self, id: &str, patch: &ResourcePatch) -> AdapterResult<()> {
        let storage = self.storage.clone();
        let row_id = id.to_string();
        let patch = patch.clone();
        let updated = run_blocking(move || {
            storage
                .update_raw_with(&row_id, |bytes| {
                    let mut resource: Resource = serde_json::from_slice(bytes)?;
                    patch.apply_to(&mut resource);
                    Ok(serde_json::to_vec(&resource)?)
                })
                .map_err(storage_error)
        })
        .await?;
        if !updated {
            return Err(AdapterError::NotFound(id.to_string()));
        }
        debug!(resource_id = %id, "table update");
        Ok(())
    }

    async fn delete(&self, id: &str) -> AdapterResult<()> {
        let storage = self.storage.clone();
        let row_id = id.to_string();
        let existed =
            run_blocking(move || storage.delete(&row_id).map_err(storage_error)).await?;
        if !existed {
            return Err(AdapterError::NotFound(id.to_string()));
        }
        debug!(resource_id = %id, "table delete");
        Ok(())
    }
}
