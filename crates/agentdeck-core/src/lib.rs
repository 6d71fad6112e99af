pub mod adapters;
pub mod config;
pub mod error;
pub mod notify;
pub mod store;

pub use agentdeck_storage::paths;
pub use agentdeck_traits::{
    AdapterError, Resource, ResourceAdapter, ResourcePatch, ResourceType, SnapshotCache,
};
pub use config::{AppConfig, BackendKind, ConfigError};
pub use error::{StoreError, StoreResult};
pub use notify::{Notification, Notifier, Severity};
pub use store::{EditorDraft, LoadOutcome, ResourceStore, ResourceUpdate, ViewState};

use std::sync::Arc;

use agentdeck_storage::Storage;
use anyhow::Context;
use tracing::info;

use adapters::{CACHE_KEY, MemoryAdapter, SnapshotAdapter, TableAdapter};

/// Application state shared by every front end.
///
/// Owns the storage handle (absent for the memory backend) and the loaded
/// resource store.
pub struct AppCore {
    pub store: Arc<ResourceStore>,
    pub config: AppConfig,
    pub storage: Option<Arc<Storage>>,
    pub load_outcome: LoadOutcome,
}

impl AppCore {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate().context("Invalid configuration")?;
        let notifier = Notifier::new(config.notification_ttl());

        let (store, storage) = match config.backend {
            BackendKind::Memory => {
                let mut adapter = MemoryAdapter::new();
                if let Some(timeout) = config.adapter_timeout() {
                    adapter = adapter.with_timeout(timeout);
                }
                (ResourceStore::new(Arc::new(adapter), notifier), None)
            }
            BackendKind::Snapshot | BackendKind::Table => {
                let db_path = config.resolve_db_path()?;
                if let Some(parent) = db_path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {}", parent.display())
                    })?;
                }
                let storage = Arc::new(Storage::new(&db_path)?);
                let store = Self::build_store(&config, &storage, notifier);
                (store, Some(storage))
            }
        };

        info!(backend = %config.backend, "Initializing AgentDeck");
        let store = Arc::new(store);
        let load_outcome = store.load().await;

        Ok(Self {
            store,
            config,
            storage,
            load_outcome,
        })
    }

    fn build_store(config: &AppConfig, storage: &Storage, notifier: Notifier) -> ResourceStore {
        match config.backend {
            BackendKind::Table => {
                let table = TableAdapter::new(storage.resources.clone());
                let table = match config.adapter_timeout() {
                    Some(timeout) => table.with_timeout(timeout),
                    None => table,
                };
                let store = ResourceStore::new(Arc::new(table), notifier);
                if config.cache_snapshot {
                    let cache = SnapshotAdapter::with_key(storage.snapshots.clone(), CACHE_KEY);
                    store.with_cache(Arc::new(cache))
                } else {
                    store
                }
            }
            _ => {
                let snapshot = SnapshotAdapter::new(storage.snapshots.clone());
                let snapshot = match config.adapter_timeout() {
                    Some(timeout) => snapshot.with_timeout(timeout),
                    None => snapshot,
                };
                ResourceStore::new(Arc::new(snapshot), notifier)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_snapshot_backend_persists_across_restarts() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig {
            db_path: Some(temp_dir.path().join("nested").join("agentdeck.db")),
            ..AppConfig::default()
        };

        {
            let core = AppCore::new(config.clone()).await.unwrap();
            assert_eq!(core.load_outcome, LoadOutcome::Fresh(0));
            core.store
                .create(ResourceType::Skills, "Review")
                .await
                .unwrap();
        }

        let core = AppCore::new(config).await.unwrap();
        assert_eq!(core.load_outcome, LoadOutcome::Fresh(1));
        assert_eq!(core.store.resources()[0].name, "Review");
    }

    #[tokio::test]
    async fn test_table_backend_mirrors_into_cache_key() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig {
            backend: BackendKind::Table,
            db_path: Some(temp_dir.path().join("agentdeck.db")),
            ..AppConfig::default()
        };
        let core = AppCore::new(config).await.unwrap();
        core.store
            .create(ResourceType::Hooks, "pre-commit")
            .await
            .unwrap();

        let storage = core.storage.as_ref().unwrap();
        assert_eq!(storage.resources.count().unwrap(), 1);
        assert!(storage.snapshots.exists(CACHE_KEY).unwrap());
        assert!(!storage.snapshots.exists(adapters::STORAGE_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_memory_backend_has_no_storage() {
        let config = AppConfig {
            backend: BackendKind::Memory,
            ..AppConfig::default()
        };
        let core = AppCore::new(config).await.unwrap();
        assert!(core.storage.is_none());
        assert_eq!(core.store.backend(), "memory");
    }

    #[tokio::test]
    async fn test_invalid_config_is_rejected() {
        let config = AppConfig {
            notification_ttl_ms: 0,
            backend: BackendKind::Memory,
            ..AppConfig::default()
        };
        assert!(AppCore::new(config).await.is_err());
    }
}
