//! In-memory storage with an optional quota.

use std::collections::HashMap;

use super::Storage;
use crate::error::StorageError;

/// `HashMap`-backed storage.
///
/// With a quota set, a write that would push the total size of keys plus
/// values past the quota fails with [`StorageError::QuotaExceeded`] and
/// leaves the previous value in place, like a full browser storage area.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage holding at most `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Total bytes currently held (keys plus values).
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.slots.iter().map(|(k, v)| k.len() + v.len()).sum()
    }

    /// Number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            let replaced = self.slots.get(key).map_or(0, |old| key.len() + old.len());
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }
        self.slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}
