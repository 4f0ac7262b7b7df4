//! Folio Cache - TTL caching and stale-while-revalidate fetching
//!
//! Provides an in-memory TTL cache, a cached-fetch adapter on top of it, and
//! a small HTTP service that serves portfolio content through both.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod upstream;

pub use api::AppState;
pub use cache::SharedCache;
pub use config::Config;
pub use error::{CacheError, Result};
pub use fetch::{CachedFetch, FetchOptions, FetchState};
