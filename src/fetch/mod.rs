//! Fetch Module
//!
//! Cached-fetch adapter with stale-while-revalidate semantics, built on
//! top of the shared TTL cache.

mod adapter;
mod options;
mod state;

pub use adapter::{invalidate, CachedFetch};
pub use options::{ErrorCallback, FetchOptions, SuccessCallback};
pub use state::{meta_key, FetchMeta, FetchState, META_PREFIX};
