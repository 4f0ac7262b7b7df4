//! Request DTOs for the content cache API
//!
//! Defines query parameters and path validation for incoming requests.

use serde::Deserialize;

/// Maximum allowed resource name length
pub const MAX_RESOURCE_LENGTH: usize = 64;

/// Query string for GET /content/:resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentQuery {
    /// Drop any cached copy and fetch from upstream
    #[serde(default)]
    pub refresh: bool,
}

/// Validates a content resource name.
///
/// Returns an error message if validation fails, None if valid.
pub fn validate_resource(resource: &str) -> Option<String> {
    if resource.is_empty() {
        return Some("Resource cannot be empty".to_string());
    }
    if resource.len() > MAX_RESOURCE_LENGTH {
        return Some(format!(
            "Resource exceeds maximum length of {} characters",
            MAX_RESOURCE_LENGTH
        ));
    }
    if !resource
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Some(
            "Resource may only contain letters, digits, '-' and '_'".to_string(),
        );
    }
    None
}
