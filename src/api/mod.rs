//! API Module
//!
//! HTTP handlers and routing for the content cache service.
//!
//! # Endpoints
//! - `GET /content/:resource` - Serve a content resource through the cache
//! - `DELETE /cache/:key` - Clear one cache key
//! - `DELETE /cache` - Clear the whole cache
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
