//! Data Transfer Objects (DTOs) for the content cache API
//!
//! Request and response types for HTTP endpoints.

pub mod requests;
pub mod responses;

pub use requests::*;
pub use responses::*;
