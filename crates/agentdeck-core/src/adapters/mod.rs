//! Persistence adapter implementations.
//!
//! Each backend implements [`ResourceAdapter`](agentdeck_traits::ResourceAdapter)
//! so the resource store can be pointed at any of them without change:
//!
//! - [`SnapshotAdapter`] keeps the whole collection as one JSON array under a
//!   fixed key (durable local storage)
//! - [`TableAdapter`] keeps one JSON row per resource id (row-level table)
//! - [`MemoryAdapter`] keeps records in memory, with fault injection for tests

mod memory;
mod snapshot;
mod table;

pub use memory::{AdapterOp, MemoryAdapter};
pub use snapshot::{CACHE_KEY, STORAGE_KEY, SnapshotAdapter};
pub use table::TableAdapter;

use agentdeck_traits::{AdapterError, AdapterResult};

/// Recover an [`AdapterError`] raised inside a storage closure, or wrap any
/// other storage failure as `StoreUnavailable`.
pub(crate) fn storage_error(err: anyhow::Error) -> AdapterError {
    match err.downcast::<AdapterError>() {
        Ok(adapter_err) => adapter_err,
        Err(other) => AdapterError::StoreUnavailable(format!("{other:#}")),
    }
}

/// Run blocking storage work off the async worker threads.
///
/// The returned future yields until the work finishes, so a caller-side
/// timeout can fire while redb is still busy.
pub(crate) async fn run_blocking<T, F>(work: F) -> AdapterResult<T>
where
    F: FnOnce() -> AdapterResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| AdapterError::StoreUnavailable(format!("storage task failed: {err}")))?
}
