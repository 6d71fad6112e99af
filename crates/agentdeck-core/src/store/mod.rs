//! Resource store: the in-memory collection, its view state and every
//! mutation that reaches the persistence adapter.

mod draft;
mod inflight;
mod view;

pub use draft::EditorDraft;
pub use view::ViewState;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use agentdeck_storage::time_utils;
use agentdeck_traits::{
    AdapterError, AdapterResult, Resource, ResourceAdapter, ResourcePatch, ResourceType,
    SnapshotCache, sort_by_recency,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::notify::Notifier;
use inflight::InFlight;

/// Fields a caller may change on an existing resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl ResourceUpdate {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            content: None,
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            name: None,
            content: Some(content.into()),
        }
    }
}

/// Where the collection came from on the last load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "count", rename_all = "lowercase")]
pub enum LoadOutcome {
    /// Listed from the adapter.
    Fresh(usize),
    /// Adapter failed; restored from the snapshot cache.
    Cached(usize),
    /// Adapter failed and nothing could be restored.
    Empty,
}

impl LoadOutcome {
    /// True when the collection may not reflect the backend.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, LoadOutcome::Fresh(_))
    }
}

#[derive(Debug, Default)]
struct StoreState {
    resources: HashMap<String, Resource>,
    /// Ids deleted during this process; never reissued or reloaded.
    retired: HashSet<String>,
    view: ViewState,
}

impl StoreState {
    fn name_taken(&self, name: &str, except_id: Option<&str>) -> bool {
        self.resources
            .values()
            .any(|resource| Some(resource.id.as_str()) != except_id && resource.name_eq(name))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if !self.resources.contains_key(&id) && !self.retired.contains(&id) {
                return id;
            }
        }
    }

    fn sorted(&self) -> Vec<Resource> {
        let mut resources: Vec<Resource> = self.resources.values().cloned().collect();
        sort_by_recency(&mut resources);
        resources
    }

    /// Point the selection at the canonical copy, or clear it if the record is gone.
    fn resync_selection(&mut self) {
        let refreshed = self
            .view
            .selected_id()
            .and_then(|id| self.resources.get(id))
            .cloned();
        self.view.selected = refreshed;
    }

    fn replace_all(&mut self, resources: Vec<Resource>) -> usize {
        let mut loaded = HashMap::with_capacity(resources.len());
        for resource in resources {
            if self.retired.contains(&resource.id) {
                warn!(resource_id = %resource.id, "skipping deleted resource returned by load");
                continue;
            }
            loaded.insert(resource.id.clone(), resource);
        }
        self.resources = loaded;
        self.resync_selection();
        self.resources.len()
    }
}

/// Single source of truth for resources and view state.
///
/// Share it by `Arc`; all methods take `&self`. In-memory state is only
/// changed after the adapter confirms a mutation, so a failed call leaves the
/// collection exactly as it was.
pub struct ResourceStore {
    adapter: Arc<dyn ResourceAdapter>,
    cache: Option<Arc<dyn SnapshotCache>>,
    notifier: Notifier,
    state: Mutex<StoreState>,
    in_flight: InFlight,
    /// Mutations share it, `load` takes it exclusively.
    sync: tokio::sync::RwLock<()>,
    /// Orders cache writes so the last one always carries the latest state.
    cache_writes: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for ResourceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceStore")
            .field("backend", &self.adapter.name())
            .field("cached", &self.cache.is_some())
            .field("resources", &self.state.lock().resources.len())
            .finish()
    }
}

impl ResourceStore {
    pub fn new(adapter: Arc<dyn ResourceAdapter>, notifier: Notifier) -> Self {
        Self {
            adapter,
            cache: None,
            notifier,
            state: Mutex::new(StoreState::default()),
            in_flight: InFlight::default(),
            sync: tokio::sync::RwLock::new(()),
            cache_writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Mirror the collection into `cache` and fall back to it when load fails.
    pub fn with_cache(mut self, cache: Arc<dyn SnapshotCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn backend(&self) -> &str {
        self.adapter.name()
    }

    // ── Synchronization ─────────────────────────────────────────────

    /// Replace the collection with the adapter's record set.
    ///
    /// Waits for in-flight mutations to settle and holds new ones back until
    /// the collection has been replaced.
    pub async fn load(&self) -> LoadOutcome {
        let _exclusive = self.sync.write().await;
        let backend = self.adapter.name();
        match self.call(self.adapter.list()).await {
            Ok(resources) => {
                let count = self.state.lock().replace_all(resources);
                info!(backend, count, "loaded resources");
                self.refresh_cache().await;
                LoadOutcome::Fresh(count)
            }
            Err(err) => {
                warn!(backend, error = %err, "failed to load resources");
                self.notifier
                    .error(format!("Failed to load resources: {err}"));
                self.load_from_cache().await
            }
        }
    }

    async fn load_from_cache(&self) -> LoadOutcome {
        let restored = match &self.cache {
            Some(cache) => match cache.load_snapshot().await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    warn!(error = %err, "snapshot cache unreadable");
                    None
                }
            },
            None => None,
        };

        let mut state = self.state.lock();
        match restored {
            Some(resources) => {
                let count = state.replace_all(resources);
                info!(count, "restored resources from snapshot cache");
                LoadOutcome::Cached(count)
            }
            None => {
                state.replace_all(Vec::new());
                LoadOutcome::Empty
            }
        }
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Create a resource with templated content and select it.
    pub async fn create(&self, kind: ResourceType, name: &str) -> StoreResult<Resource> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject(StoreError::InvalidName));
        }
        let Some(_guard) = self.in_flight.try_acquire(InFlight::name_key(name)) else {
            return Err(self.reject(StoreError::Busy(name.to_string())));
        };
        let _shared = self.sync.read().await;

        let resource = {
            let state = self.state.lock();
            if state.name_taken(name, None) {
                drop(state);
                return Err(self.reject(StoreError::DuplicateName(name.to_string())));
            }
            Resource::new(state.fresh_id(), kind, name, time_utils::now())
        };

        if let Err(err) = self.call(self.adapter.insert(&resource)).await {
            return Err(self.reject(err));
        }

        {
            let mut state = self.state.lock();
            state
                .resources
                .insert(resource.id.clone(), resource.clone());
            state.view.selected = Some(resource.clone());
        }
        debug!(resource_id = %resource.id, kind = %kind, "resource created");
        self.refresh_cache().await;
        self.notifier
            .success(format!("{} created successfully", resource.name));
        Ok(resource)
    }

    /// Change a resource's name and/or content.
    pub async fn update(&self, id: &str, update: ResourceUpdate) -> StoreResult<Resource> {
        let name = update.name.as_deref().map(str::trim);
        if name.is_some_and(str::is_empty) {
            return Err(self.reject(StoreError::InvalidName));
        }
        let Some(_id_guard) = self.in_flight.try_acquire(InFlight::id_key(id)) else {
            return Err(self.reject(StoreError::Busy(id.to_string())));
        };
        let _shared = self.sync.read().await;

        // A real rename also claims the target name against concurrent creates.
        let renaming = name.is_some_and(|name| {
            self.state
                .lock()
                .resources
                .get(id)
                .is_none_or(|current| !current.name_eq(name))
        });
        let _name_guard = match name {
            Some(name) if renaming => match self.in_flight.try_acquire(InFlight::name_key(name)) {
                Some(guard) => Some(guard),
                None => return Err(self.reject(StoreError::Busy(name.to_string()))),
            },
            _ => None,
        };

        let patch = {
            let state = self.state.lock();
            let checked = match name {
                Some(name) if state.name_taken(name, Some(id)) => {
                    Err(StoreError::DuplicateName(name.to_string()))
                }
                _ => state
                    .resources
                    .get(id)
                    .ok_or_else(|| StoreError::NotFound(id.to_string())),
            };
            match checked {
                Ok(current) => ResourcePatch {
                    name: name.map(str::to_string),
                    content: update.content,
                    updated_at: Some(time_utils::now().max(current.updated_at)),
                },
                Err(err) => {
                    drop(state);
                    return Err(self.reject(err));
                }
            }
        };

        if let Err(err) = self.call(self.adapter.update(id, &patch)).await {
            return Err(self.reject(err));
        }

        let updated = {
            let mut state = self.state.lock();
            let updated = state.resources.get_mut(id).map(|resource| {
                patch.apply_to(resource);
                resource.clone()
            });
            state.resync_selection();
            updated
        };
        let Some(updated) = updated else {
            return Err(self.reject(StoreError::NotFound(id.to_string())));
        };

        debug!(resource_id = %id, "resource updated");
        self.refresh_cache().await;
        self.notifier.success("Changes saved");
        Ok(updated)
    }

    /// Delete a resource and retire its id.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let Some(_guard) = self.in_flight.try_acquire(InFlight::id_key(id)) else {
            return Err(self.reject(StoreError::Busy(id.to_string())));
        };
        let _shared = self.sync.read().await;

        if let Err(err) = self.call(self.adapter.delete(id)).await {
            return Err(self.reject(err));
        }

        {
            let mut state = self.state.lock();
            state.resources.remove(id);
            state.retired.insert(id.to_string());
            state.resync_selection();
        }
        debug!(resource_id = %id, "resource deleted");
        self.refresh_cache().await;
        self.notifier.info("Resource deleted");
        Ok(())
    }

    /// Persist a dirty draft and resync it from the saved record.
    ///
    /// Returns `Ok(None)` without touching the adapter when nothing changed.
    /// A failed save leaves the draft dirty.
    pub async fn save_draft(&self, draft: &mut EditorDraft) -> StoreResult<Option<Resource>> {
        if !draft.has_changes() {
            return Ok(None);
        }
        let updated = self
            .update(draft.resource_id(), draft.to_update())
            .await?;
        draft.resync(&updated);
        Ok(Some(updated))
    }

    /// Reload `draft` from the canonical copy, discarding pending edits.
    ///
    /// Returns false, leaving the draft as it was, when the resource is gone.
    pub fn resync_draft(&self, draft: &mut EditorDraft) -> bool {
        match self.get(draft.resource_id()) {
            Some(resource) => {
                draft.resync(&resource);
                true
            }
            None => false,
        }
    }

    // ── View state ──────────────────────────────────────────────────

    /// Select by id. An unknown id, or `None`, clears the selection.
    pub fn select(&self, id: Option<&str>) -> Option<Resource> {
        let mut state = self.state.lock();
        let selected = id.and_then(|id| state.resources.get(id)).cloned();
        state.view.selected = selected.clone();
        selected
    }

    pub fn filter(&self, query: impl Into<String>) {
        self.state.lock().view.search_query = query.into();
    }

    pub fn set_editor_mode(&self, editing: bool) {
        self.state.lock().view.editor_mode = editing;
    }

    pub fn toggle_editor_mode(&self) -> bool {
        let mut state = self.state.lock();
        state.view.editor_mode = !state.view.editor_mode;
        state.view.editor_mode
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.state.lock().view.sidebar_open = open;
    }

    pub fn toggle_sidebar(&self) -> bool {
        let mut state = self.state.lock();
        state.view.sidebar_open = !state.view.sidebar_open;
        state.view.sidebar_open
    }

    pub fn view(&self) -> ViewState {
        self.state.lock().view.clone()
    }

    pub fn selected(&self) -> Option<Resource> {
        self.state.lock().view.selected.clone()
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Every resource, most recently updated first.
    pub fn resources(&self) -> Vec<Resource> {
        self.state.lock().sorted()
    }

    pub fn get(&self, id: &str) -> Option<Resource> {
        self.state.lock().resources.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resources matching the current search query.
    pub fn visible(&self) -> Vec<Resource> {
        let state = self.state.lock();
        let needle = state.view.search_query.to_lowercase();
        let mut visible: Vec<Resource> = state
            .resources
            .values()
            .filter(|resource| resource.matches(&needle))
            .cloned()
            .collect();
        sort_by_recency(&mut visible);
        visible
    }

    pub fn visible_by_type(&self, kind: ResourceType) -> Vec<Resource> {
        self.visible()
            .into_iter()
            .filter(|resource| resource.kind == kind)
            .collect()
    }

    /// Visible count per type, in sidebar order.
    pub fn folder_counts(&self) -> Vec<(ResourceType, usize)> {
        let visible = self.visible();
        ResourceType::ALL
            .into_iter()
            .map(|kind| {
                let count = visible.iter().filter(|r| r.kind == kind).count();
                (kind, count)
            })
            .collect()
    }

    // ── Internals ───────────────────────────────────────────────────

    /// Await an adapter call, bounded by the adapter's timeout if it has one.
    async fn call<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = AdapterResult<T>>,
    {
        let result = match self.adapter.timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(AdapterError::StoreUnavailable(format!(
                    "{} backend timed out after {}ms",
                    self.adapter.name(),
                    limit.as_millis()
                ))),
            },
            None => call.await,
        };
        result.map_err(StoreError::from)
    }

    /// Raise an error notification for `err` and hand it back.
    fn reject(&self, err: StoreError) -> StoreError {
        if err.is_validation() {
            debug!(error = %err, "mutation rejected");
        } else {
            warn!(backend = self.adapter.name(), error = %err, "adapter call failed");
        }
        self.notifier.error(err.to_string());
        err
    }

    async fn refresh_cache(&self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let _ordered = self.cache_writes.lock().await;
        let snapshot = self.resources();
        if let Err(err) = cache.save_snapshot(&snapshot).await {
            warn!(error = %err, "failed to refresh snapshot cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{AdapterOp, MemoryAdapter};
    use crate::notify::Severity;

    fn store_with(adapter: Arc<MemoryAdapter>) -> ResourceStore {
        ResourceStore::new(adapter, Notifier::default())
    }

    #[tokio::test]
    async fn test_create_trims_and_selects() {
        let adapter = Arc::new(MemoryAdapter::new());
        let store = store_with(adapter.clone());

        let created = store
            .create(ResourceType::Agents, "  Bot One  ")
            .await
            .unwrap();
        assert_eq!(created.name, "Bot One");
        assert_eq!(store.selected(), Some(created.clone()));
        assert_eq!(adapter.records(), vec![created]);
        assert_eq!(
            store.notifier().current().unwrap().message,
            "Bot One created successfully"
        );
    }

    #[tokio::test]
    async fn test_blank_name_rejected_before_adapter() {
        let adapter = Arc::new(MemoryAdapter::new());
        let store = store_with(adapter.clone());

        let err = store.create(ResourceType::Hooks, "   ").await.unwrap_err();
        assert_eq!(err, StoreError::InvalidName);
        assert_eq!(adapter.calls(AdapterOp::Insert), 0);
        assert_eq!(
            store.notifier().current().unwrap().severity,
            Severity::Error
        );
    }

    #[tokio::test]
    async fn test_update_unknown_id_skips_adapter() {
        let adapter = Arc::new(MemoryAdapter::new());
        let store = store_with(adapter.clone());

        let err = store
            .update("ghost", ResourceUpdate::content("x"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound("ghost".to_string()));
        assert_eq!(adapter.calls(AdapterOp::Update), 0);
    }

    #[tokio::test]
    async fn test_rename_to_own_name_in_other_case_is_allowed() {
        let store = store_with(Arc::new(MemoryAdapter::new()));
        let created = store.create(ResourceType::Skills, "review").await.unwrap();

        let renamed = store
            .update(&created.id, ResourceUpdate::name("Review"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Review");
        assert!(renamed.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_select_unknown_clears_selection() {
        let store = store_with(Arc::new(MemoryAdapter::new()));
        let created = store.create(ResourceType::Agents, "Bot").await.unwrap();
        assert!(store.view().is_selected(&created.id));

        assert_eq!(store.select(Some("nope")), None);
        assert_eq!(store.view().selected, None);
        assert_eq!(store.select(Some(created.id.as_str())), Some(created.clone()));
    }

    #[test]
    fn test_view_toggles() {
        let store = store_with(Arc::new(MemoryAdapter::new()));
        let view = store.view();
        assert!(view.editor_mode);
        assert!(view.sidebar_open);

        assert!(!store.toggle_editor_mode());
        assert!(!store.toggle_sidebar());
        store.set_editor_mode(true);
        store.set_sidebar_open(true);
        assert_eq!(store.view(), ViewState::default());
    }

    #[test]
    fn test_load_outcome_serializes_with_source_tag() {
        let value = serde_json::to_value(LoadOutcome::Cached(3)).unwrap();
        assert_eq!(value, serde_json::json!({"source": "cached", "count": 3}));
        assert!(LoadOutcome::Empty.is_degraded());
        assert!(!LoadOutcome::Fresh(0).is_degraded());
    }
}
