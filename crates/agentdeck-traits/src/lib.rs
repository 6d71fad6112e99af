//! AgentDeck Traits - Shared resource model and persistence abstractions.
//!
//! This crate provides the interfaces shared across the AgentDeck workspace:
//! - `Resource`, `ResourceType` and `ResourcePatch` data types
//! - `ResourceAdapter`, the persistence boundary every backend implements
//! - `SnapshotCache`, the best-effort fallback used when a backend cannot load
//! - `AdapterError`, the adapter-level error taxonomy

pub mod adapter;
pub mod error;
pub mod resource;

// ── Top-level re-exports ─────────────────────────────────────────────

// Error types
pub use error::{AdapterError, AdapterResult};

// Adapter traits
pub use adapter::{ResourceAdapter, SnapshotCache};

// Resource model
pub use resource::{
    ParseResourceTypeError, Resource, ResourcePatch, ResourceType, default_content,
    sort_by_recency,
};
