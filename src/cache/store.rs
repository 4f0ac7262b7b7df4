//! Cache Store Module
//!
//! Main cache engine: HashMap storage with per-entry expiry, enforced on read.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, DEFAULT_EXPIRY};

// == Cache Store ==
/// Unbounded key/value storage with lazy TTL expiration.
///
/// Values of any `'static` type can live side by side; readers name the
/// type they expect. Expired entries are only removed when a read finds
/// them, or by `clear_all`.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Expiry applied by `set`
    default_expiry: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore whose `set` uses `default_expiry`.
    pub fn new(default_expiry: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_expiry,
        }
    }

    // == Set ==
    /// Stores a value under `key` with the default expiry.
    ///
    /// Any existing entry is replaced wholesale.
    pub fn set<T: Send + Sync + 'static>(&mut self, key: impl Into<String>, value: T) {
        let expiry = self.default_expiry;
        self.set_with_expiry(key, value, expiry);
    }

    /// Stores a value under `key` with an explicit expiry.
    pub fn set_with_expiry<T: Send + Sync + 'static>(
        &mut self,
        key: impl Into<String>,
        value: T,
        expiry: Duration,
    ) {
        let key = key.into();
        debug!(key = %key, expiry_ms = expiry.as_millis() as u64, "cache set");
        self.entries.insert(key, CacheEntry::new(value, expiry));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Returns `None` if the key is absent, expired or holds another type.
    /// Expired entries are removed as a side effect.
    pub fn get<T: Clone + 'static>(&mut self, key: &str) -> Option<T> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.entries.remove(key);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_expiration();
            debug!(key = %key, "cache entry expired on read");
            return None;
        }

        match entry.value_as::<T>() {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                warn!(
                    key = %key,
                    expected = std::any::type_name::<T>(),
                    "cache entry holds a different type"
                );
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Like [`get`](Self::get), but leaves hit/miss statistics untouched.
    ///
    /// Used for bookkeeping reads that are not cache lookups in their own
    /// right. Expired entries are still removed.
    pub fn peek<T: Clone + 'static>(&mut self, key: &str) -> Option<T> {
        let entry = self.entries.get(key)?;

        if entry.is_expired() {
            self.entries.remove(key);
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        entry.value_as::<T>()
    }

    // == Clear ==
    /// Removes the entry for `key`. Returns whether an entry was present.
    pub fn clear(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear All ==
    /// Removes every entry, returning how many there were.
    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the number of stored entries, including expired ones not yet read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRY)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store = CacheStore::default();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::default();

        store.set("key1", "value1".to_string());
        let value = store.get::<String>("key1");

        assert_eq!(value.as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::default();
        assert!(store.get::<String>("nonexistent").is_none());
    }

    #[test]
    fn test_store_overwrite_replaces_type_and_value() {
        let mut store = CacheStore::default();

        store.set("key1", "value1".to_string());
        store.set("key1", 7u64);

        assert!(store.get::<String>("key1").is_none());
        assert_eq!(store.get::<u64>("key1"), Some(7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_type_mismatch_keeps_entry() {
        let mut store = CacheStore::default();
        store.set("key1", vec![1u8, 2, 3]);

        assert!(store.get::<String>("key1").is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get::<Vec<u8>>("key1"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::default();

        store.set("key1", 1i32);
        store.set("key2", 2i32);

        assert!(store.clear("key1"));
        assert!(!store.clear("key1"), "Second clear is a no-op");
        assert!(store.get::<i32>("key1").is_none());
        assert_eq!(store.get::<i32>("key2"), Some(2));
    }

    #[test]
    fn test_store_clear_all() {
        let mut store = CacheStore::default();

        store.set("key1", 1i32);
        store.set("key2", 2i32);

        assert_eq!(store.clear_all(), 2);
        assert!(store.is_empty());
        assert!(store.get::<i32>("key1").is_none());
        assert!(store.get::<i32>("key2").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_expiry_scenario() {
        let mut store = CacheStore::default();
        store.set_with_expiry("a", 1i32, Duration::from_millis(1000));

        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(store.get::<i32>("a"), Some(1));

        tokio::time::advance(Duration::from_millis(1000)).await;
        assert!(store.get::<i32>("a").is_none());
        assert!(store.is_empty(), "Expired entry is removed on read");
        assert!(!store.clear("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_expiry_is_lazy() {
        let mut store = CacheStore::default();
        store.set_with_expiry("a", 1i32, Duration::from_millis(10));

        tokio::time::advance(Duration::from_millis(50)).await;
        assert_eq!(store.len(), 1, "Expired entry lingers until read");

        assert!(store.get::<i32>("a").is_none());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_default_expiry() {
        let mut store = CacheStore::default();
        store.set("a", 1i32);

        tokio::time::advance(DEFAULT_EXPIRY).await;
        assert_eq!(store.get::<i32>("a"), Some(1));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(store.get::<i32>("a").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_peek_leaves_stats_alone() {
        let mut store = CacheStore::default();
        store.set("key1", 1i32);
        store.set_with_expiry("short", 2i32, Duration::from_millis(10));

        assert_eq!(store.peek::<i32>("key1"), Some(1));
        assert!(store.peek::<i32>("missing").is_none());
        assert!(store.peek::<String>("key1").is_none());

        tokio::time::advance(Duration::from_millis(20)).await;
        assert!(store.peek::<i32>("short").is_none());
        assert_eq!(store.len(), 1, "Expired entry is removed on peek");

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.expirations, 0);
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_stats() {
        let mut store = CacheStore::default();

        store.set_with_expiry("short", 1i32, Duration::from_millis(10));
        store.set("key1", 1i32);
        store.get::<i32>("key1"); // hit
        store.get::<i32>("nonexistent"); // miss

        tokio::time::advance(Duration::from_millis(20)).await;
        store.get::<i32>("short"); // expired

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.total_entries, 1);
    }
}
