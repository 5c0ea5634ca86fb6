use crate::error::StorageError;

/// Durable key-value slot - abstraction over browser-style local storage.
///
/// Values are opaque text; the post store owns their schema. Implementations
/// must report capacity failures as [`StorageError::QuotaExceeded`] so the
/// store can degrade and retry.
pub trait KeyValueSlot: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
