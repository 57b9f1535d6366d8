//! NetBox connection configuration
//!
//! Usually loaded from environment variables:
//!
//! | Variable | Default |
//! |---|---|
//! | `NETBOX_URL` | `http://localhost:8000` |
//! | `NETBOX_TOKEN` | required |
//! | `NETBOX_API_PREFIX` | `/api` |
//! | `NETBOX_TIMEOUT_SECS` | `30` |
//! | `NETBOX_VERIFY_TLS` | `true` |

use crate::error::NetBoxError;
use std::env;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:8000";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for [`NetBoxClient`](crate::NetBoxClient)
#[derive(Clone)]
pub struct NetBoxConfig {
    /// NetBox base URL (e.g., "http://netbox:80"), without the API prefix
    pub base_url: String,
    /// API token sent as `Authorization: Token <token>`
    pub token: String,
    pub api_prefix: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Verify the server certificate on HTTPS
    pub verify_tls: bool,
}

// Keep the token out of logs
impl std::fmt::Debug for NetBoxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetBoxConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("api_prefix", &self.api_prefix)
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .finish()
    }
}

impl NetBoxConfig {
    /// Configuration with defaults for everything but URL and token
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
        }
    }

    /// Load configuration from `NETBOX_*` environment variables
    pub fn from_env() -> Result<Self, NetBoxError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NetBoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("NETBOX_URL").unwrap_or_else(|| DEFAULT_URL.to_string());
        let token = lookup("NETBOX_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                NetBoxError::InvalidConfig("NETBOX_TOKEN environment variable is required".to_string())
            })?;

        let mut config = Self::new(base_url, token);

        if let Some(prefix) = lookup("NETBOX_API_PREFIX") {
            config.api_prefix = prefix;
        }

        if let Some(raw) = lookup("NETBOX_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                NetBoxError::InvalidConfig(format!("NETBOX_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("NETBOX_VERIFY_TLS") {
            config.verify_tls = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(NetBoxError::InvalidConfig(format!(
                        "NETBOX_VERIFY_TLS must be true or false, got '{}'",
                        raw
                    )));
                }
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the URL scheme and normalize trailing/leading slashes
    pub fn validate(&mut self) -> Result<(), NetBoxError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(NetBoxError::InvalidConfig(format!(
                "NetBox URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();

        let prefix = self.api_prefix.trim_matches('/');
        self.api_prefix = if prefix.is_empty() { String::new() } else { format!("/{}", prefix) };
        Ok(())
    }
}
