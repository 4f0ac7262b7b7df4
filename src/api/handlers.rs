//! API Handlers
//!
//! HTTP request handlers for each content cache endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{SharedCache, DEFAULT_EXPIRY};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::fetch::{invalidate, CachedFetch, FetchOptions};
use crate::models::{
    validate_resource, ClearAllResponse, ClearResponse, ContentQuery, ContentResponse,
    ContentSource, HealthResponse, StatsResponse,
};
use crate::upstream::UpstreamClient;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide cache
    pub cache: SharedCache,
    /// Content API client
    pub upstream: Arc<UpstreamClient>,
    /// TTL for fetched content
    pub cache_time: Duration,
    /// Age after which cached content is revalidated in the background
    pub stale_time: Duration,
}

impl AppState {
    /// Creates a new AppState with default fetch timings.
    pub fn new(cache: SharedCache, upstream: UpstreamClient) -> Self {
        Self {
            cache,
            upstream: Arc::new(upstream),
            cache_time: DEFAULT_EXPIRY,
            stale_time: Duration::ZERO,
        }
    }

    pub fn with_fetch_times(mut self, cache_time: Duration, stale_time: Duration) -> Self {
        self.cache_time = cache_time;
        self.stale_time = stale_time;
        self
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = SharedCache::new(config.cache_time());
        let upstream = UpstreamClient::new(config.upstream_url.clone(), config.upstream_timeout())?;
        Ok(Self::new(cache, upstream).with_fetch_times(config.cache_time(), config.stale_time()))
    }

    fn fetch_options(&self) -> FetchOptions<Value> {
        FetchOptions::new()
            .with_cache_time(self.cache_time)
            .with_stale_time(self.stale_time)
    }
}

/// Cache key under which a content resource is stored.
pub fn content_key(resource: &str) -> String {
    format!("content:{}", resource)
}

/// Handler for GET /content/:resource
///
/// Serves a content resource through the cache. Stale hits are answered
/// immediately and refreshed in the background; `?refresh=true` forces a
/// fetch from upstream.
pub async fn content_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<ContentResponse>> {
    if let Some(error_msg) = validate_resource(&resource) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let key = content_key(&resource);
    if query.refresh {
        invalidate(&state.cache, &key);
    }

    let upstream = state.upstream.clone();
    let name = resource.clone();
    let producer = move || {
        let upstream = upstream.clone();
        let name = name.clone();
        async move { upstream.fetch_resource(&name).await }
    };

    let mut fetch = CachedFetch::subscribe(&state.cache, key, producer, state.fetch_options());
    let source = if fetch.is_cache_hit() {
        ContentSource::Cache
    } else {
        ContentSource::Upstream
    };

    let settled = fetch.settled().await;
    match (settled.data, settled.error) {
        (Some(data), _) => Ok(Json(ContentResponse::new(resource, source, data))),
        (None, Some(error)) => Err(error),
        (None, None) => Err(CacheError::Internal(format!(
            "fetch for '{}' settled without data",
            resource
        ))),
    }
}

/// Handler for DELETE /cache/:key
///
/// Removes one entry together with its fetch metadata. Clearing an absent
/// key is not an error.
pub async fn clear_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<ClearResponse> {
    let removed = invalidate(&state.cache, &key);
    info!(key = %key, removed, "cache key cleared");
    Json(ClearResponse::new(key, removed))
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearAllResponse> {
    let removed = state.cache.clear_all();
    info!(removed, "cache cleared");
    Json(ClearAllResponse::new(removed))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
