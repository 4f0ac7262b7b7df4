//! Shared Cache Handle
//!
//! Thread-safe handle to a single `CacheStore`, cloned into every consumer.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore, DEFAULT_EXPIRY};

/// Cloneable handle to one process-wide cache.
///
/// Construct it once at startup and pass clones to whatever needs caching.
/// Every operation takes the lock briefly and never across an `.await`.
#[derive(Clone, Debug)]
pub struct SharedCache {
    store: Arc<Mutex<CacheStore>>,
}

impl SharedCache {
    pub fn new(default_expiry: Duration) -> Self {
        Self::from_store(CacheStore::new(default_expiry))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// See [`CacheStore::get`].
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.store.lock().get(key)
    }

    /// See [`CacheStore::peek`].
    pub fn peek<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.store.lock().peek(key)
    }

    /// See [`CacheStore::set`].
    pub fn set<T: Send + Sync + 'static>(&self, key: impl Into<String>, value: T) {
        self.store.lock().set(key, value);
    }

    /// See [`CacheStore::set_with_expiry`].
    pub fn set_with_expiry<T: Send + Sync + 'static>(
        &self,
        key: impl Into<String>,
        value: T,
        expiry: Duration,
    ) {
        self.store.lock().set_with_expiry(key, value, expiry);
    }

    pub fn clear(&self, key: &str) -> bool {
        self.store.lock().clear(key)
    }

    pub fn clear_all(&self) -> usize {
        self.store.lock().clear_all()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

impl Default for SharedCache {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY)
    }
}
