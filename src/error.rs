//! Error types for the content cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and its fetch adapter.
///
/// Cloneable so it can be published through fetch state to every observer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The wrapped producer failed
    #[error("Fetch failed for '{key}': {message}")]
    FetchFailed { key: String, message: String },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Normalizes a producer failure, keeping the full cause chain.
    pub fn fetch_failed(key: impl Into<String>, err: anyhow::Error) -> Self {
        CacheError::FetchFailed {
            key: key.into(),
            message: format!("{:#}", err),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::FetchFailed { .. } => StatusCode::BAD_GATEWAY,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the content cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failed_keeps_cause_chain() {
        let err = anyhow::anyhow!("connection refused").context("loading skills");
        let wrapped = CacheError::fetch_failed("content:skills", err);

        let text = wrapped.to_string();
        assert!(text.contains("content:skills"));
        assert!(text.contains("loading skills"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_status_codes() {
        let resp = CacheError::fetch_failed("k", anyhow::anyhow!("boom")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = CacheError::InvalidRequest("bad".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = CacheError::Internal("oops".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
