use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::types::{LocalStorage, StorageError};

/// In-process storage with an optional byte quota.
///
/// Clones share the same records, so a test can hand one clone to a store
/// and inspect or pre-seed through another. The quota mimics a browser
/// refusing writes once storage is full.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that rejects writes pushing total key+value bytes past `quota`.
    pub fn with_quota(quota: usize) -> Self {
        let storage = Self::default();
        storage.lock().quota = Some(quota);
        storage
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock only means another holder panicked mid-insert; the
    // map itself is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn used_without(&self, key: &str) -> usize {
        self.records
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().records.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.lock();
        if let Some(quota) = inner.quota {
            let needed = inner.used_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        inner.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock().records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_records() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set_item("k", "v").await.unwrap();
        assert_eq!(b.get_item("k").await.unwrap().as_deref(), Some("v"));
        assert_eq!(b.len(), 1);
    }

    #[tokio::test]
    async fn test_quota_rejects_oversized_write() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345").await.unwrap();

        let err = storage.set_item("k2", "123456").await.unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(storage.get_item("k2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_quota_counts_replaced_value_once() {
        let storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "12345678").await.unwrap();
        // Replacing the same key frees the old value first
        storage.set_item("k", "87654321").await.unwrap();
        assert_eq!(storage.get_item("k").await.unwrap().as_deref(), Some("87654321"));
    }
}
