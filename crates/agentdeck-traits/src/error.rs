//! Adapter error types.

/// Result alias for persistence adapter calls.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Errors reported by a [`ResourceAdapter`](crate::ResourceAdapter).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdapterError {
    /// A record with this id is already stored.
    #[error("resource {0} already exists")]
    DuplicateKey(String),

    /// The target record does not exist.
    #[error("resource {0} not found")]
    NotFound(String),

    /// The backing store could not be reached or failed mid-operation.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl AdapterError {
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::StoreUnavailable(message.to_string())
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(value: serde_json::Error) -> Self {
        Self::StoreUnavailable(format!("corrupt resource data: {value}"))
    }
}
