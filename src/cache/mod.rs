//! Cache Module
//!
//! Provides in-memory caching with per-entry TTL and expire-on-read.

use std::time::Duration;

mod entry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Expiry used when a value is stored without one
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(5 * 60);
