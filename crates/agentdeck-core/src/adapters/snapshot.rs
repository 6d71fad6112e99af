//! Durable local backend: the whole collection under one storage key.

use std::time::Duration;

use agentdeck_storage::SnapshotStorage;
use agentdeck_traits::{
    AdapterError, AdapterResult, Resource, ResourceAdapter, ResourcePatch, SnapshotCache,
    sort_by_recency,
};
use async_trait::async_trait;
use tracing::debug;

use super::{run_blocking, storage_error};

/// Fixed key the collection is stored under.
pub const STORAGE_KEY: &str = "ai_agent_resources";

/// Key used when a snapshot mirrors another backend as its load fallback.
pub const CACHE_KEY: &str = "ai_agent_resources.cache";

/// Stores every resource as one serialized JSON array.
///
/// Each mutation is a read-modify-write of the array inside a single redb
/// write transaction, so a failed mutation leaves the previous array intact.
#[derive(Debug, Clone)]
pub struct SnapshotAdapter {
    storage: SnapshotStorage,
    key: String,
    timeout: Option<Duration>,
}

impl SnapshotAdapter {
    pub fn new(storage: SnapshotStorage) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: SnapshotStorage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_all(&self) -> AdapterResult<Option<Vec<Resource>>> {
        let Some(bytes) = self.storage.get_raw(&self.key).map_err(storage_error)? else {
            return Ok(None);
        };
        Ok(Some(decode(Some(&bytes))?))
    }

    /// Applies `mutate` to the stored array and writes it back atomically.
    fn rewrite<F>(&self, mutate: F) -> AdapterResult<()>
    where
        F: FnOnce(&mut Vec<Resource>) -> AdapterResult<()>,
    {
        self.storage
            .replace_with(&self.key, |current| {
                let mut resources = decode(current)?;
                mutate(&mut resources)?;
                Ok(serde_json::to_vec(&resources)?)
            })
            .map_err(storage_error)
    }
}

fn decode(bytes: Option<&[u8]>) -> AdapterResult<Vec<Resource>> {
    match bytes {
        Some(bytes) => Ok(serde_json::from_slice(bytes)?),
        None => Ok(Vec::new()),
    }
}

#[async_trait]
impl ResourceAdapter for SnapshotAdapter {
    fn name(&self) -> &str {
        "snapshot"
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn list(&self) -> AdapterResult<Vec<Resource>> {
        let this = self.clone();
        let mut resources = run_blocking(move || this.read_all()).await?.unwrap_or_default();
        sort_by_recency(&mut resources);
        Ok(resources)
    }

    async fn insert(&self, resource: &Resource) -> AdapterResult<()> {
        let this = self.clone();
        let record = resource.clone();
        run_blocking(move || {
            this.rewrite(|resources| {
                if resources.iter().any(|existing| existing.id == record.id) {
                    return Err(AdapterError::DuplicateKey(record.id.clone()));
                }
                resources.push(record);
                Ok(())
            })
        })
        .await?;
        debug!(resource_id = %resource.id, key = %self.key, "snapshot insert");
        Ok(())
    }

    async fn update(&self, id: &str, patch: &ResourcePatch) -> AdapterResult<()> {
        let this = self.clone();
        let target = id.to_string();
        let patch = patch.clone();
        run_blocking(move || {
            this.rewrite(|resources| {
                let resource = resources
                    .iter_mut()
                    .find(|existing| existing.id == target)
                    .ok_or_else(|| AdapterError::NotFound(target.clone()))?;
                patch.apply_to(resource);
                Ok(())
            })
        })
        .await?;
        debug!(resource_id = %id, key = %self.key, "snapshot update");
        Ok(())
    }

    async fn delete(&self, id: &str) -> AdapterResult<()> {
        let this = self.clone();
        let target = id.to_string();
        run_blocking(move || {
            this.rewrite(|resources| {
                let before = resources.len();
                resources.retain(|existing| existing.id != target);
                if resources.len() == before {
                    return Err(AdapterError::NotFound(target.clone()));
                }
                Ok(())
            })
        })
        .await?;
        debug!(resource_id = %id, key = %self.key, "snapshot delete");
        Ok(())
    }
}

#[async_trait]
impl SnapshotCache for SnapshotAdapter {
    async fn load_snapshot(&self) -> AdapterResult<Option<Vec<Resource>>> {
        let this = self.clone();
        run_blocking(move || this.read_all()).await
    }

    async fn save_snapshot(&self, resources: &[Resource]) -> AdapterResult<()> {
        let storage = self.storage.clone();
        let key = self.key.clone();
        let bytes = serde_json::to_vec(resources)?;
        run_blocking(move || storage.put_raw(&key, &bytes).map_err(storage_error)).await
    }
}
