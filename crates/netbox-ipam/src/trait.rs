//! NetBoxTransport trait
//!
//! The resource client only needs four verbs from a connection. Abstracting
//! them behind this trait lets the concrete [`NetBoxClient`](crate::NetBoxClient)
//! be swapped for [`MockTransport`](crate::mock::MockTransport) in unit tests.

use crate::error::NetBoxError;
use crate::record::{Fields, Record};

/// Connection to a NetBox API
///
/// Paths are relative to the API root (e.g. `/ipam/vrfs/`). Implementations own
/// authentication, pagination, timeouts and status translation.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait NetBoxTransport: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// GET a collection (or nested list endpoint) with query filters
    async fn get(&self, path: &str, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError>;

    /// POST a new record. Rejections surface as [`NetBoxError::Create`].
    async fn post(&self, path: &str, body: &Fields) -> Result<Record, NetBoxError>;

    /// PATCH record `id` under `path`. Rejections surface as [`NetBoxError::Update`].
    async fn patch(&self, path: &str, id: u64, body: &Fields) -> Result<Record, NetBoxError>;

    /// DELETE record `id` under `path`. Rejections surface as [`NetBoxError::Delete`].
    async fn delete(&self, path: &str, id: u64) -> Result<(), NetBoxError>;
}
