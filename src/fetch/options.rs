//! Fetch Options
//!
//! Per-subscription configuration for the cached-fetch adapter.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::DEFAULT_EXPIRY;
use crate::error::CacheError;

pub type SuccessCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type ErrorCallback = Arc<dyn Fn(&CacheError) + Send + Sync>;

// == Fetch Options ==
/// Options recognized by [`CachedFetch`](super::CachedFetch).
pub struct FetchOptions<T> {
    /// Value published before the first fetch completes
    pub initial_data: Option<T>,
    /// Time-to-live written into the cache for successful results
    pub cache_time: Duration,
    /// Age after which a cache hit is revalidated in the background.
    /// Zero revalidates on every hit.
    pub stale_time: Duration,
    /// Invoked after every successful fetch, initial or background
    pub on_success: Option<SuccessCallback<T>>,
    /// Invoked after every failed fetch
    pub on_error: Option<ErrorCallback>,
}

impl<T> FetchOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_data(mut self, data: T) -> Self {
        self.initial_data = Some(data);
        self
    }

    pub fn with_cache_time(mut self, cache_time: Duration) -> Self {
        self.cache_time = cache_time;
        self
    }

    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&CacheError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Whether an entry of the given age should be refreshed.
    ///
    /// A missing age (no metadata) is treated as infinitely stale.
    pub fn is_stale(&self, age: Option<Duration>) -> bool {
        match age {
            None => true,
            Some(_) if self.stale_time.is_zero() => true,
            Some(age) => age > self.stale_time,
        }
    }
}

impl<T> Default for FetchOptions<T> {
    fn default() -> Self {
        Self {
            initial_data: None,
            cache_time: DEFAULT_EXPIRY,
            stale_time: Duration::ZERO,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T: Clone> Clone for FetchOptions<T> {
    fn clone(&self) -> Self {
        Self {
            initial_data: self.initial_data.clone(),
            cache_time: self.cache_time,
            stale_time: self.stale_time,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for FetchOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("initial_data", &self.initial_data)
            .field("cache_time", &self.cache_time)
            .field("stale_time", &self.stale_time)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
