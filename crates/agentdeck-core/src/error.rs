//! Resource store error types.

use agentdeck_traits::AdapterError;

/// Result alias for resource store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Why a store operation was rejected or failed.
///
/// `InvalidName`, `DuplicateName` and `Busy` are raised before the adapter is
/// called; the rest come back from the adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Resource name cannot be empty")]
    InvalidName,

    #[error("A resource with the name \"{0}\" already exists")]
    DuplicateName(String),

    #[error("A previous change to \"{0}\" is still being saved")]
    Busy(String),

    #[error("Resource {0} not found")]
    NotFound(String),

    #[error("Resource {0} already exists in storage")]
    DuplicateKey(String),

    #[error("Storage unavailable: {0}")]
    StoreUnavailable(String),
}

impl StoreError {
    /// True for failures detected locally, without touching the adapter.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidName | Self::DuplicateName(_) | Self::Busy(_)
        )
    }
}

impl From<AdapterError> for StoreError {
    fn from(value: AdapterError) -> Self {
        match value {
            AdapterError::DuplicateKey(id) => Self::DuplicateKey(id),
            AdapterError::NotFound(id) => Self::NotFound(id),
            AdapterError::StoreUnavailable(message) => Self::StoreUnavailable(message),
        }
    }
}
