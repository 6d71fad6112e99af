//! In-memory backend with deterministic fault injection.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use agentdeck_traits::{
    AdapterError, AdapterResult, Resource, ResourceAdapter, ResourcePatch, sort_by_recency,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::sleep;

/// Adapter operation, used to target injected faults and read call counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterOp {
    List,
    Insert,
    Update,
    Delete,
}

impl AdapterOp {
    fn index(self) -> usize {
        match self {
            AdapterOp::List => 0,
            AdapterOp::Insert => 1,
            AdapterOp::Update => 2,
            AdapterOp::Delete => 3,
        }
    }
}

/// Volatile adapter for tests and throwaway sessions.
///
/// It can inject a fixed latency and fail the next N calls of an operation
/// with `StoreUnavailable`.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    records: Mutex<Vec<Resource>>,
    failures: Mutex<HashMap<AdapterOp, u32>>,
    latency: Mutex<Option<Duration>>,
    timeout: Option<Duration>,
    calls: [AtomicUsize; 4],
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with the given records already persisted.
    pub fn with_resources(resources: Vec<Resource>) -> Self {
        let adapter = Self::default();
        *adapter.records.lock() = resources;
        adapter
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Fail the next `times` calls of `op`.
    pub fn fail_next(&self, op: AdapterOp, times: u32) {
        *self.failures.lock().entry(op).or_insert(0) += times;
    }

    /// Delay every call by `latency` before it touches the records.
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// Number of calls of `op` received so far, including failed ones.
    pub fn calls(&self, op: AdapterOp) -> usize {
        self.calls[op.index()].load(Ordering::SeqCst)
    }

    /// Copy of the persisted records in insertion order.
    pub fn records(&self) -> Vec<Resource> {
        self.records.lock().clone()
    }

    async fn enter(&self, op: AdapterOp) -> AdapterResult<()> {
        self.calls[op.index()].fetch_add(1, Ordering::SeqCst);

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            sleep(latency).await;
        }

        let mut failures = self.failures.lock();
        if let Some(remaining) = failures.get_mut(&op)
            && *remaining > 0
        {
            *remaining -= 1;
            return Err(AdapterError::StoreUnavailable(format!(
                "injected {op:?} failure"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceAdapter for MemoryAdapter {
    fn name(&self) -> &str {
        "memory"
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn list(&self) -> AdapterResult<Vec<Resource>> {
        self.enter(AdapterOp::List).await?;
        let mut resources = self.records.lock().clone();
        sort_by_recency(&mut resources);
        Ok(resources)
    }

    async fn insert(&self, resource: &Resource) -> AdapterResult<()> {
        self.enter(AdapterOp::Insert).await?;
        let mut records = self.records.lock();
        if records.iter().any(|existing| existing.id == resource.id) {
            return Err(AdapterError::DuplicateKey(resource.id.clone()));
        }
        records.push(resource.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: &ResourcePatch) -> AdapterResult<()> {
        self.enter(AdapterOp::Update).await?;
        let mut records = self.records.lock();
        let resource = records
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| AdapterError::NotFound(id.to_string()))?;
        patch.apply_to(resource);
        Ok(())
    }

    async fn delete(&self, id: &str) -> AdapterResult<()> {
        self.enter(AdapterOp::Delete).await?;
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|existing| existing.id != id);
        if records.len() == before {
            return Err(AdapterError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_traits::ResourceType;
    use chrono::Utc;

    #[tokio::test]
    async fn test_fail_next_is_consumed() {
        let adapter = MemoryAdapter::new();
        adapter.fail_next(AdapterOp::Insert, 1);
        let resource = Resource::new("r-1", ResourceType::Agents, "Bot", Utc::now());

        let err = adapter.insert(&resource).await.unwrap_err();
        assert!(matches!(err, AdapterError::StoreUnavailable(_)));
        assert!(adapter.records().is_empty());

        adapter.insert(&resource).await.unwrap();
        assert_eq!(adapter.records().len(), 1);
        assert_eq!(adapter.calls(AdapterOp::Insert), 2);
        assert_eq!(adapter.calls(AdapterOp::List), 0);
    }

    #[tokio::test]
    async fn test_injected_failures_target_one_operation() {
        let resource = Resource::new("r-1", ResourceType::Agents, "Bot", Utc::now());
        let adapter = MemoryAdapter::with_resources(vec![resource]);
        adapter.fail_next(AdapterOp::Delete, 2);

        assert_eq!(adapter.list().await.unwrap().len(), 1);
        assert!(adapter.delete("r-1").await.is_err());
        assert!(adapter.delete("r-1").await.is_err());
        adapter.delete("r-1").await.unwrap();
        assert_eq!(
            adapter.delete("r-1").await.unwrap_err(),
            AdapterError::NotFound("r-1".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_delays_calls() {
        let adapter = MemoryAdapter::new();
        adapter.set_latency(Some(Duration::from_secs(2)));

        let started = tokio::time::Instant::now();
        adapter.list().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }
}
