//! Persistence adapter abstractions.
//!
//! These traits define the storage boundary the resource store talks to.
//! Implementations are provided by downstream crates (e.g., agentdeck-core).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::resource::{Resource, ResourcePatch};

// ── ResourceAdapter ──────────────────────────────────────────────────

/// Backend capable of persisting resource records keyed by id.
///
/// Every call is the only path by which resource data crosses the process
/// boundary. Writes are all-or-nothing: a failed call leaves no partially
/// written record visible to a later `list`.
#[async_trait]
pub trait ResourceAdapter: Send + Sync {
    /// Short backend label for logs.
    fn name(&self) -> &str;

    /// Upper bound the caller should put on each call, if the backend has one.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Full record set, most recently updated first.
    async fn list(&self) -> AdapterResult<Vec<Resource>>;

    /// Persists a new record. Fails with `DuplicateKey` if the id is taken.
    async fn insert(&self, resource: &Resource) -> AdapterResult<()>;

    /// Merges `patch` into the stored record. Fails with `NotFound` if absent.
    async fn update(&self, id: &str, patch: &ResourcePatch) -> AdapterResult<()>;

    /// Removes the record. Fails with `NotFound` if already absent.
    async fn delete(&self, id: &str) -> AdapterResult<()>;
}

// ── SnapshotCache ────────────────────────────────────────────────────

/// Last known local copy of the whole collection.
///
/// Used by the store as a fallback when the primary adapter cannot load.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// Returns `None` when nothing has been cached yet.
    async fn load_snapshot(&self) -> AdapterResult<Option<Vec<Resource>>>;

    async fn save_snapshot(&self, resources: &[Resource]) -> AdapterResult<()>;
}
