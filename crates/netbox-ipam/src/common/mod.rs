//! Common utilities for the NetBox HTTP transport
//!
//! Provides the authenticated request helper used by [`NetBoxClient`](crate::NetBoxClient).

pub mod query;

use crate::error::NetBoxError;
use crate::record::{Fields, Record};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Paginated response wrapper from NetBox API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Any shape a NetBox list endpoint answers with.
///
/// Collections are paginated, nested endpoints such as `available-ips` return
/// a bare array, and a few return a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListBody {
    Page(PaginatedResponse<Record>),
    List(Vec<Record>),
    Single(Record),
}

impl ListBody {
    /// Split into the records of this page and the next page URL
    pub fn into_parts(self) -> (Vec<Record>, Option<String>) {
        match self {
            Self::Page(page) => (page.results, page.next),
            Self::List(records) => (records, None),
            Self::Single(record) => (vec![record], None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        })
    }
}

/// HTTP client wrapper with authentication
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_prefix: String,
    token: String,
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("api_prefix", &self.api_prefix)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, base_url: String, api_prefix: String, token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix,
            token,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from an API path. Absolute URLs (pagination links)
    /// are used as-is.
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}{}", self.base_url, self.api_prefix, path)
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Fetch one page of a list endpoint
    pub async fn fetch_page(&self, url: &str) -> Result<(Vec<Record>, Option<String>), NetBoxError> {
        debug!("GET {}", url);

        let response = self.client
            .get(url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = check_status(response, Verb::Get, url).await?;
        let body: ListBody = decode(response).await?;
        Ok(body.into_parts())
    }

    /// Fetch all pages of a paginated response
    pub async fn fetch_all_pages(&self, mut url: String) -> Result<Vec<Record>, NetBoxError> {
        let mut all_results = Vec::new();

        loop {
            let (records, next) = self.fetch_page(&url).await?;
            all_results.extend(records);

            match next {
                Some(next_url) => {
                    url = self.build_url(&next_url);
                }
                None => break,
            }
        }

        Ok(all_results)
    }

    /// GET a single JSON document
    pub async fn get_value(&self, path: &str) -> Result<serde_json::Value, NetBoxError> {
        let url = self.build_url(path);
        debug!("GET {}", url);

        let response = self.client
            .get(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await?;

        let response = check_status(response, Verb::Get, path).await?;
        decode(response).await
    }

    /// Make a POST request
    pub async fn post(&self, path: &str, body: &Fields) -> Result<Record, NetBoxError> {
        let url = self.build_url(path);
        debug!("POST {} with body: {}", url, serde_json::to_string(body).unwrap_or_default());

        let response = self.client
            .post(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let response = check_status(response, Verb::Post, path).await?;
        decode(response).await
    }

    /// Make a PATCH request
    pub async fn patch(&self, path: &str, body: &Fields) -> Result<Record, NetBoxError> {
        let url = self.build_url(path);
        debug!("PATCH {} with body: {}", url, serde_json::to_string(body).unwrap_or_default());

        let response = self.client
            .patch(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;

        let response = check_status(response, Verb::Patch, path).await?;
        decode(response).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<(), NetBoxError> {
        let url = self.build_url(path);
        debug!("DELETE {}", url);

        let response = self.client
            .delete(&url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json")
            .send()
            .await?;

        check_status(response, Verb::Delete, path).await?;
        Ok(())
    }
}

/// Turn a non-success response into the matching error.
///
/// 401/403 are authentication failures whatever the verb. Otherwise reads
/// fail as `NotFound`/`Api` and mutations as `Create`/`Update`/`Delete`.
async fn check_status(response: Response, verb: Verb, path: &str) -> Result<Response, NetBoxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = format!("{} {} failed: {} - {}", verb, path, status, body);

    Err(match (verb, status) {
        (_, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => NetBoxError::Authentication(detail),
        (Verb::Get, StatusCode::NOT_FOUND) => NetBoxError::NotFound(detail),
        (Verb::Get, _) => NetBoxError::Api(detail),
        (Verb::Post, _) => NetBoxError::Create(detail),
        (Verb::Patch, _) => NetBoxError::Update(detail),
        (Verb::Delete, _) => NetBoxError::Delete(detail),
    })
}

/// Deserialize a response body, keeping the start of the body for bad payloads
async fn decode<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, NetBoxError> {
    let response_text = response.text().await?;
    serde_json::from_str(&response_text).map_err(|e| {
        NetBoxError::Api(format!(
            "error decoding response body: {} - Response (first 500 chars): {}",
            e,
            response_text.chars().take(500).collect::<String>()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_body_shapes() {
        let page: ListBody = serde_json::from_value(json!({
            "count": 3,
            "next": "http://netbox/api/ipam/vrfs/?limit=2&offset=2",
            "previous": null,
            "results": [{"id": 1}, {"id": 2}]
        }))
        .unwrap();
        let (records, next) = page.into_parts();
        assert_eq!(records.len(), 2);
        assert!(next.is_some());

        let list: ListBody = serde_json::from_value(json!([{"family": 4, "address": "10.0.0.1/24"}])).unwrap();
        let (records, next) = list.into_parts();
        assert_eq!(records[0].get_str("address"), Some("10.0.0.1/24"));
        assert!(next.is_none());

        let single: ListBody = serde_json::from_value(json!({"id": 9, "name": "red"})).unwrap();
        assert_eq!(single.into_parts().0[0].id(), Some(9));
    }

    #[test]
    fn test_build_url() {
        let http = HttpClient::new(
            Client::new(),
            "http://netbox:80/".to_string(),
            "/api".to_string(),
            "t".to_string(),
        );
        assert_eq!(http.build_url("/ipam/vrfs/"), "http://netbox:80/api/ipam/vrfs/");
        assert_eq!(
            http.build_url("http://netbox:80/api/ipam/vrfs/?offset=50"),
            "http://netbox:80/api/ipam/vrfs/?offset=50"
        );
        assert_eq!(http.auth_header(), "Token t");
    }
}
