use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::errors::CoreError;

/// Key used by [`KeyValueStore::probe`].
const PROBE_KEY: &str = "[\"__probe__\"]";

/// Trait abstraction for the primary string key-value store.
///
/// Writes are synchronous and un-batched: when `set` returns, the value is
/// as durable as the backend makes it.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError>;

    fn remove(&self, key: &str) -> Result<(), CoreError>;

    /// Remove every key.
    fn clear(&self) -> Result<(), CoreError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, CoreError>;

    /// Check the store accepts writes. A store that silently drops data
    /// must be reported, not tolerated.
    fn probe(&self) -> Result<(), CoreError> {
        self.set(PROBE_KEY, "1")
            .and_then(|_| self.remove(PROBE_KEY))
            .map_err(|e| CoreError::StorageUnavailable(e.to_string()))
    }
}

/// In-memory store. Clones share the same map, the way every tab of one
/// origin shares its local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `set`/`remove`/`clear` calls served so far.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.lock().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut inner = self.lock();
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut inner = self.lock();
        inner.entries.remove(key);
        inner.writes += 1;
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.writes += 1;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.lock().entries.keys().cloned().collect())
    }
}
