//! Storage trait definitions

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value store for session snapshots.
///
/// Values are opaque JSON strings. Implementations must be thread-safe
/// (Send + Sync) since debounced writes run on background tasks.
pub trait SessionStore: Send + Sync {
    /// Read the value stored under a key
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or replace the value under a key
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Returns true if it existed.
    fn remove(&self, key: &str) -> StorageResult<bool>;

    /// All keys starting with `prefix`, sorted
    fn keys(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: SessionStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
