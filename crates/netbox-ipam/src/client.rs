//! NetBox API client
//!
//! The production [`NetBoxTransport`]: an authenticated `reqwest` connection
//! to a NetBox instance. Request paths are relative to the API root, e.g.
//! `/ipam/prefixes/` becomes `http://netbox:80/api/ipam/prefixes/`.

use crate::common::query::query_resources;
use crate::common::HttpClient;
use crate::config::NetBoxConfig;
use crate::descriptor::detail_path;
use crate::error::NetBoxError;
use crate::ipam::Ipam;
use crate::netbox_trait::NetBoxTransport;
use crate::record::{Fields, Record};
use reqwest::Client;
use tracing::debug;

/// NetBox API client
#[derive(Debug)]
pub struct NetBoxClient {
    http: HttpClient,
}

impl NetBoxClient {
    /// Create a new NetBox client
    ///
    /// # Arguments
    /// * `config` - Base URL, token, timeout and TLS settings
    pub fn new(mut config: NetBoxConfig) -> Result<Self, NetBoxError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()?;

        Ok(Self {
            http: HttpClient::new(client, config.base_url, config.api_prefix, config.token),
        })
    }

    /// Create a client from `NETBOX_*` environment variables
    pub fn from_env() -> Result<Self, NetBoxError> {
        Self::new(NetBoxConfig::from_env()?)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// IPAM operations over this client
    pub fn ipam(&self) -> Ipam<'_, Self> {
        Ipam::new(self)
    }

    /// Validate the API token by making a simple authenticated request.
    ///
    /// This method tests connectivity and token validity before proceeding with operations.
    /// It makes a lightweight request to the NetBox status endpoint.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and NetBox is reachable
    /// * `Err(NetBoxError)` - Token is invalid or NetBox is unreachable
    pub async fn validate_token(&self) -> Result<(), NetBoxError> {
        debug!("Validating NetBox token and connectivity");
        let status = self.http.get_value("/status/").await?;

        if let Some(version) = status.get("netbox-version").and_then(|v| v.as_str()) {
            debug!("Token validated successfully (NetBox {})", version);
        } else {
            debug!("Token validated successfully");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl NetBoxTransport for NetBoxClient {
    fn base_url(&self) -> &str {
        self.http.base_url()
    }

    async fn get(&self, path: &str, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        query_resources(&self.http, path, filters).await
    }

    async fn post(&self, path: &str, body: &Fields) -> Result<Record, NetBoxError> {
        self.http.post(path, body).await
    }

    async fn patch(&self, path: &str, id: u64, body: &Fields) -> Result<Record, NetBoxError> {
        self.http.patch(&detail_path(path, id), body).await
    }

    async fn delete(&self, path: &str, id: u64) -> Result<(), NetBoxError> {
        self.http.delete(&detail_path(path, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_url() {
        let result = NetBoxClient::new(NetBoxConfig::new("netbox:80", "token"));
        assert!(matches!(result, Err(NetBoxError::InvalidConfig(_))));
    }

    #[test]
    fn test_new_normalizes_base_url() {
        let client = NetBoxClient::new(NetBoxConfig::new("http://netbox:80/", "token")).unwrap();
        assert_eq!(client.base_url(), "http://netbox:80");
    }
}
