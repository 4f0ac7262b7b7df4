//! Fetch State
//!
//! Observable state of a subscription and the metadata kept beside cached values.

use tokio::time::Instant;

use crate::error::CacheError;

/// Prefix of the companion entry that records when a key was fetched.
pub const META_PREFIX: &str = "__meta__:";

/// Returns the key under which fetch metadata for `key` is stored.
pub fn meta_key(key: &str) -> String {
    format!("{}{}", META_PREFIX, key)
}

/// Companion cache entry holding the time a value was fetched.
#[derive(Debug, Clone, Copy)]
pub struct FetchMeta {
    pub fetched_at: Instant,
}

impl FetchMeta {
    pub fn now() -> Self {
        Self {
            fetched_at: Instant::now(),
        }
    }
}

// == Fetch State ==
/// What a subscriber sees: the latest data, the latest error and whether
/// a foreground fetch is running.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub error: Option<CacheError>,
    pub is_loading: bool,
}

impl<T> FetchState<T> {
    /// State published on a cache hit.
    pub fn ready(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            is_loading: false,
        }
    }

    /// State published on a cache miss, before the producer settles.
    pub fn loading(initial_data: Option<T>) -> Self {
        Self {
            data: initial_data,
            error: None,
            is_loading: true,
        }
    }
}
