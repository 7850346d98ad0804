use spendy_domain::TransactionError;
use thiserror::Error;

/// Failures reported by a transaction store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Index is still being built: {0}")]
    IndexBuilding(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl StoreError {
    /// Only a store that is still building its index is worth retrying after a delay.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::IndexBuilding(_))
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Validation failed: {0}")]
    Validation(#[from] TransactionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Store(err) if err.is_retryable())
    }
}
