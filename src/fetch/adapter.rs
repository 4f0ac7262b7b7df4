//! Cached-Fetch Adapter
//!
//! Binds a cache key and an async producer to a `SharedCache`, publishing
//! loading/data/error state with stale-while-revalidate refreshes.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cache::SharedCache;
use crate::error::{CacheError, Result};
use crate::fetch::{meta_key, FetchMeta, FetchOptions, FetchState};

type BoxFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send>>;
type Producer<T> = Arc<dyn Fn() -> BoxFuture<T> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    /// Initial miss or manual refetch: toggles `is_loading`
    Foreground,
    /// Revalidation of a stale hit: leaves published data in place
    Background,
}

/// State shared between a subscription and the tasks it spawns.
struct Inner<T> {
    key: String,
    cache: SharedCache,
    producer: Producer<T>,
    options: FetchOptions<T>,
    state: watch::Sender<FetchState<T>>,
    alive: AtomicBool,
}

impl<T> Inner<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Writes the value and its fetch timestamp with the configured TTL.
    fn write_through(&self, data: &T) {
        let ttl = self.options.cache_time;
        self.cache.set_with_expiry(self.key.clone(), data.clone(), ttl);
        self.cache.set_with_expiry(meta_key(&self.key), FetchMeta::now(), ttl);
    }

    async fn run(&self, mode: FetchMode) -> Result<T> {
        if mode == FetchMode::Foreground && self.is_alive() {
            self.state.send_modify(|state| state.is_loading = true);
        }

        debug!(key = %self.key, ?mode, "invoking producer");
        let outcome = (self.producer)().await;

        match outcome {
            Ok(data) => {
                // The cache outlives the subscription, so write through regardless.
                self.write_through(&data);

                if self.is_alive() {
                    self.state.send_modify(|state| {
                        state.data = Some(data.clone());
                        state.error = None;
                        if mode == FetchMode::Foreground {
                            state.is_loading = false;
                        }
                    });
                    if let Some(on_success) = &self.options.on_success {
                        on_success(&data);
                    }
                } else {
                    debug!(key = %self.key, "subscription closed, discarding result");
                }
                Ok(data)
            }
            Err(err) => {
                let error = CacheError::fetch_failed(&self.key, err);
                warn!(key = %self.key, ?mode, error = %error, "producer failed");

                if self.is_alive() {
                    // Background failures keep the last good data on display.
                    self.state.send_modify(|state| {
                        state.error = Some(error.clone());
                        if mode == FetchMode::Foreground {
                            state.is_loading = false;
                        }
                    });
                    if let Some(on_error) = &self.options.on_error {
                        on_error(&error);
                    }
                }
                Err(error)
            }
        }
    }
}

fn spawn_fetch<T>(inner: &Arc<Inner<T>>, mode: FetchMode)
where
    T: Clone + Send + Sync + 'static,
{
    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        // Errors already reached state and `on_error`.
        let _ = inner.run(mode).await;
    });
}

// == Cached Fetch ==
/// A live subscription to one cache key.
///
/// Dropping the subscription stops state publication and callbacks. A fetch
/// that is already running still completes and still writes to the cache.
pub struct CachedFetch<T> {
    inner: Arc<Inner<T>>,
    receiver: watch::Receiver<FetchState<T>>,
    cache_hit: bool,
}

impl<T> CachedFetch<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Subscribes to `key`, consulting the cache before invoking `producer`.
    ///
    /// On a hit the cached value is published before this returns, and a
    /// background refresh is spawned when the entry is stale. On a miss the
    /// state starts out loading and the producer runs on a spawned task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn subscribe<F, Fut, E>(
        cache: &SharedCache,
        key: impl Into<String>,
        producer: F,
        options: FetchOptions<T>,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
        E: Into<anyhow::Error>,
    {
        let key = key.into();
        let producer: Producer<T> = Arc::new(move || -> BoxFuture<T> {
            let fut = producer();
            Box::pin(async move { fut.await.map_err(Into::into) })
        });

        let cached = cache.get::<T>(&key);
        let cache_hit = cached.is_some();
        let age = if cache_hit {
            cache
                .peek::<FetchMeta>(&meta_key(&key))
                .map(|meta| meta.fetched_at.elapsed())
        } else {
            None
        };

        let initial = match cached {
            Some(data) => FetchState::ready(data),
            None => FetchState::loading(options.initial_data.clone()),
        };
        let (state, receiver) = watch::channel(initial);

        let inner = Arc::new(Inner {
            key,
            cache: cache.clone(),
            producer,
            options,
            state,
            alive: AtomicBool::new(true),
        });

        if !cache_hit {
            debug!(key = %inner.key, "cache miss");
            spawn_fetch(&inner, FetchMode::Foreground);
        } else if inner.options.is_stale(age) {
            debug!(key = %inner.key, ?age, "stale cache hit, revalidating");
            spawn_fetch(&inner, FetchMode::Background);
        } else {
            debug!(key = %inner.key, ?age, "fresh cache hit");
        }

        Self {
            inner,
            receiver,
            cache_hit,
        }
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Whether the subscription was first served from the cache.
    pub fn is_cache_hit(&self) -> bool {
        self.cache_hit
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FetchState<T> {
        self.receiver.borrow().clone()
    }

    /// A receiver that observes every state publication.
    pub fn watch(&self) -> watch::Receiver<FetchState<T>> {
        self.receiver.clone()
    }

    /// Waits until the published state satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&FetchState<T>) -> bool,
    ) -> FetchState<T> {
        if let Ok(state) = self.receiver.wait_for(&mut predicate).await {
            return state.clone();
        }
        self.receiver.borrow().clone()
    }

    /// Waits until no foreground fetch is running.
    pub async fn settled(&mut self) -> FetchState<T> {
        self.wait_for(|state| !state.is_loading).await
    }

    /// Invokes the producer unconditionally, bypassing the cache.
    ///
    /// State, cache and callbacks are updated as on a miss, and the outcome
    /// is also returned. Concurrent refetches are not coalesced; the last
    /// to settle determines the published data.
    pub async fn refetch(&self) -> Result<T> {
        self.inner.run(FetchMode::Foreground).await
    }

    /// Ends the subscription. Equivalent to dropping it.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for CachedFetch<T> {
    fn drop(&mut self) {
        self.inner.alive.store(false, Ordering::Release);
    }
}

/// Removes a fetched value and its metadata so the next subscriber misses.
pub fn invalidate(cache: &SharedCache, key: &str) -> bool {
    let removed = cache.clear(key);
    cache.clear(&meta_key(key));
    removed
}
