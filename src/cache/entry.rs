//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Type-erased value held by an entry.
pub type ErasedValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// Represents a single cache entry with value and expiry.
///
/// Timestamps come from `tokio::time::Instant` so a paused test clock
/// drives expiration.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: ErasedValue,
    /// Instant the entry was written
    pub written_at: Instant,
    /// Lifetime of the entry, relative to `written_at`
    pub expiry: Duration,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped at the current instant.
    pub fn new<T: Send + Sync + 'static>(value: T, expiry: Duration) -> Self {
        Self {
            value: Arc::new(value),
            written_at: Instant::now(),
            expiry,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is expired once `now` is strictly past `written_at + expiry`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now > self.written_at + self.expiry
    }

    /// Checks if the entry has expired at the current instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Returns a clone of the value if it was stored as a `T`.
    pub fn value_as<T: Clone + 'static>(&self) -> Option<T> {
        self.value.downcast_ref::<T>().cloned()
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, saturating at zero.
    pub fn ttl_remaining(&self) -> Duration {
        (self.written_at + self.expiry).saturating_duration_since(Instant::now())
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("written_at", &self.written_at)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
