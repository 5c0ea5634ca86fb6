//! In-memory slot implementation - the durable slot of a single process.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard, PoisonError};

use postquell_core::error::StorageError;
use postquell_core::ports::KeyValueSlot;

/// In-memory key-value slot using a HashMap behind a RwLock.
///
/// An optional quota caps the total size of all keys and values in bytes,
/// the way browser local storage does, so quota handling can be exercised
/// without a browser.
/// Note: Data is lost on process restart.
#[derive(Debug, Default)]
pub struct InMemorySlot {
    store: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl InMemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot that rejects writes pushing total usage past `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.read()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KeyValueSlot for InMemorySlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut store = self.write();

        if let Some(limit) = self.quota {
            // The entry being replaced does not count against the new write.
            let others: usize = store
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                tracing::debug!(key = %key, needed, limit, "Slot write rejected by quota");
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        store.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let slot = InMemorySlot::new();
        slot.set("key1", "value1").unwrap();
        assert_eq!(slot.get("key1").unwrap(), Some("value1".to_string()));
    }

    #[test]
    fn test_remove() {
        let slot = InMemorySlot::new();
        slot.set("key1", "value1").unwrap();
        slot.remove("key1").unwrap();
        assert_eq!(slot.get("key1").unwrap(), None);
        // Removing twice is fine.
        slot.remove("key1").unwrap();
    }

    #[test]
    fn test_quota_counts_all_entries() {
        let slot = InMemorySlot::with_quota(20);
        slot.set("a", "123456789").unwrap();
        assert_eq!(slot.used_bytes(), 10);

        let err = slot.set("b", "1234567890").unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(slot.get("b").unwrap(), None);
    }

    #[test]
    fn test_quota_ignores_replaced_value() {
        let slot = InMemorySlot::with_quota(12);
        slot.set("k", "12345678901").unwrap();
        slot.set("k", "abcdefghijk").unwrap();
        assert_eq!(slot.get("k").unwrap().as_deref(), Some("abcdefghijk"));

        assert!(matches!(
            slot.set("k", "abcdefghijkl"),
            Err(StorageError::QuotaExceeded { needed: 13, limit: 12 })
        ));
    }
}
