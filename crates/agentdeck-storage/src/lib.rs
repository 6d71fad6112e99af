//! AgentDeck Storage - Low-level storage abstraction layer
//!
//! This crate provides the persistence primitives for AgentDeck, using redb as
//! the embedded database. It exposes byte-level APIs so that it does not
//! depend on the resource model; typed wrappers live in agentdeck-core.
//!
//! # Tables
//!
//! - `resources` - One serialized resource per row, keyed by id
//! - `snapshots` - Whole serialized collections under fixed keys

pub mod paths;
pub mod resource_table;
pub mod simple_storage;
pub mod snapshot;
pub mod time_utils;

use anyhow::{Context, Result};
use redb::Database;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub use resource_table::ResourceTableStorage;
pub use simple_storage::SimpleStorage;
pub use snapshot::SnapshotStorage;

/// Central storage manager that initializes all storage tables.
pub struct Storage {
    db: Arc<Database>,
    pub resources: ResourceTableStorage,
    pub snapshots: SnapshotStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = Arc::new(
            Database::create(path)
                .with_context(|| format!("Failed to open database {}", path.display()))?,
        );
        debug!(path = %path.display(), "opened resource database");

        let resources = ResourceTableStorage::new(db.clone())?;
        let snapshots = SnapshotStorage::new(db.clone())?;

        Ok(Self {
            db,
            resources,
            snapshots,
        })
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
