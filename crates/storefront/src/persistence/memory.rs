//! In-memory key-value store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use super::{KeyValueStore, StorageError};

/// Key-value store held in process memory.
///
/// Clones share the same slots. An optional byte quota and an availability
/// switch let callers reproduce full or disabled storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    slots: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store holding at most `bytes` of values.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            inner: Arc::new(MemoryStoreInner {
                quota: Some(bytes),
                ..MemoryStoreInner::default()
            }),
        }
    }

    /// Toggle whether reads and writes succeed.
    pub fn set_available(&self, available: bool) {
        self.inner.unavailable.store(!available, Ordering::SeqCst);
    }

    fn slots(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, StorageError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("memory store disabled".to_string()));
        }
        self.inner
            .slots
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots()?;

        if let Some(quota) = self.inner.quota {
            let used: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let available = quota.saturating_sub(used);
            if value.len() > available {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    available,
                });
            }
        }

        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.slots()?.remove(key);
        Ok(())
    }
}
