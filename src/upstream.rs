//! Upstream Content Client
//!
//! Fetches portfolio content resources from the content API.

use std::time::Duration;

use anyhow::Context;
use serde_json::Value;
use tracing::debug;

use crate::error::{CacheError, Result};

/// HTTP client for `GET {base_url}/api/{resource}`.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Creates a client with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/api/{}", self.base_url, resource)
    }

    /// Fetches one resource as JSON. Non-2xx responses are errors.
    pub async fn fetch_resource(&self, resource: &str) -> anyhow::Result<Value> {
        let url = self.resource_url(resource);
        debug!(url = %url, "fetching upstream resource");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("upstream rejected {}", url))?;

        response
            .json::<Value>()
            .await
            .with_context(|| format!("invalid JSON from {}", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url_trims_trailing_slash() {
        let client = UpstreamClient::new("http://content.local/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://content.local");
        assert_eq!(
            client.resource_url("projects"),
            "http://content.local/api/projects"
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_an_error() {
        // Port 9 (discard) is not expected to serve HTTP.
        let client = UpstreamClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let result = client.fetch_resource("skills").await;
        assert!(result.is_err());
    }
}
