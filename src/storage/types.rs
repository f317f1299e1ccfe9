use std::future::Future;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Local persistence errors.
///
/// The content store logs these and carries on; none of them is shown to
/// the reader.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Another process holds the database lock
    #[error("Local store is locked by another process")]
    Locked,

    /// Schema creation failed
    #[error("Local store migration failed: {0}")]
    Migration(String),

    /// Write would exceed the configured capacity
    #[error("Local store quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    /// Generic database error
    #[error("Local store error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Classify a sqlx error, recognising SQLite lock conditions.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let message = err.to_string().to_lowercase();
        if message.contains("database is locked")
            || message.contains("database table is locked")
            || message.contains("sqlite_busy")
            || message.contains("sqlite_locked")
        {
            return StorageError::Locked;
        }
        StorageError::Database(err)
    }
}

// ============================================================================
// LocalStorage
// ============================================================================

/// Durable string key/value storage, shaped like the browser's
/// `localStorage`.
pub trait LocalStorage: Send + Sync {
    /// Value stored under `key`, or `None` if absent.
    fn get_item(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Insert or replace the value under `key`.
    fn set_item(&self, key: &str, value: &str)
        -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
