//! NetBox IPAM client errors

use thiserror::Error;

/// Errors that can occur when working with NetBox IPAM resources
#[derive(Debug, Error)]
pub enum NetBoxError {
    /// Client-side validation failed (e.g. a prefix with host bits set).
    /// Raised before any request is sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Lookup by filter returned no match, or nothing is available
    #[error("Not found: {0}")]
    NotFound(String),

    /// NetBox rejected a create (POST)
    #[error("Create failed: {0}")]
    Create(String),

    /// NetBox rejected an update (PATCH)
    #[error("Update failed: {0}")]
    Update(String),

    /// NetBox rejected a delete (DELETE)
    #[error("Delete failed: {0}")]
    Delete(String),

    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NetBox API returned an error on a read, or an unexpected payload
    #[error("NetBox API error: {0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Client configuration is missing or malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
