//! Query utilities for NetBox API
//!
//! Provides helpers for building queries and handling pagination.

use crate::common::HttpClient;
use crate::error::NetBoxError;
use crate::record::Record;

/// Build query string from filters. Keys and values are percent-encoded and
/// repeated keys are kept in order.
pub fn build_query_string(filters: &[(&str, &str)]) -> String {
    filters
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append filters to a path as a query string
pub fn with_query(path: &str, filters: &[(&str, &str)]) -> String {
    if filters.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, build_query_string(filters))
    }
}

/// Query a list endpoint.
///
/// Without an explicit `limit` every page is fetched by following `next`.
/// With one, only the first page is returned so the limit means what the
/// caller asked for.
pub async fn query_resources(
    http: &HttpClient,
    path: &str,
    filters: &[(&str, &str)],
) -> Result<Vec<Record>, NetBoxError> {
    let url = http.build_url(&with_query(path, filters));
    let fetch_all = !filters.iter().any(|(k, _)| *k == "limit");

    if fetch_all {
        http.fetch_all_pages(url).await
    } else {
        let (records, _) = http.fetch_page(&url).await?;
        Ok(records)
    }
}
