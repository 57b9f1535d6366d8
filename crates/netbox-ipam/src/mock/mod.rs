//! Mock transport for unit testing
//!
//! [`MockTransport`] implements [`NetBoxTransport`] over an in-memory store so
//! resource clients can be exercised without a running NetBox instance. Every
//! request is recorded as a [`Call`], which lets tests assert not only on
//! results but on exactly which requests were (or were not) sent.
//!
//! - `mod.rs` - the store, call log and trait implementation
//! - `helpers.rs` - record stamping and simplified NetBox filtering

mod helpers;

use crate::error::NetBoxError;
use crate::netbox_trait::NetBoxTransport;
use crate::record::{Fields, Record};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A request received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get { path: String, filters: Vec<(String, String)> },
    Post { path: String, body: Fields },
    Patch { path: String, id: u64, body: Fields },
    Delete { path: String, id: u64 },
}

impl Call {
    /// True for POST, PATCH and DELETE
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Get { .. })
    }
}

/// Mock NetBox transport for testing
///
/// Collections are keyed by their path and keep insertion order, so "first
/// match" behaviour is deterministic.
#[derive(Clone, Debug)]
pub struct MockTransport {
    pub(crate) base_url: String,
    pub(crate) collections: Arc<Mutex<HashMap<String, Vec<Record>>>>,
    pub(crate) available_ips: Arc<Mutex<HashMap<u64, Vec<Record>>>>,
    pub(crate) calls: Arc<Mutex<Vec<Call>>>,
    // When set, every mutation is rejected with this reason
    pub(crate) reject_reason: Arc<Mutex<Option<String>>>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            collections: Arc::new(Mutex::new(HashMap::new())),
            available_ips: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            reject_reason: Arc::new(Mutex::new(None)),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a record to a collection (for test setup). Not recorded as a call.
    ///
    /// A record without an `id` is given the next free one.
    pub fn add_record(&self, path: &str, fields: serde_json::Value) -> Record {
        let mut map = match fields {
            serde_json::Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        if !map.contains_key("id") {
            map.insert("id".to_string(), self.next_id().into());
        }
        let record = Record::from(map);
        lock(&self.collections)
            .entry(path.to_string())
            .or_default()
            .push(record.clone());
        record
    }

    /// Set the available addresses of a prefix (for test setup)
    pub fn set_available_ips(&self, prefix_id: u64, addresses: &[&str]) {
        let helpers = self.helpers();
        let ips = addresses.iter().map(|a| helpers.available_ip(a)).collect();
        lock(&self.available_ips).insert(prefix_id, ips);
    }

    /// Reject every following POST/PATCH/DELETE with `reason`
    pub fn reject_mutations(&self, reason: impl Into<String>) {
        *lock(&self.reject_reason) = Some(reason.into());
    }

    /// Current contents of a collection
    pub fn records(&self, path: &str) -> Vec<Record> {
        lock(&self.collections).get(path).cloned().unwrap_or_default()
    }

    /// Every request received so far, in order
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Requests that would have changed state
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutation).collect()
    }

    /// Generate next ID
    pub(crate) fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        let current = *id;
        *id += 1;
        current
    }

    /// Get helpers instance
    pub(crate) fn helpers(&self) -> helpers::Helpers {
        helpers::Helpers::new(self.base_url.clone())
    }

    fn record_call(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn rejection(&self) -> Option<String> {
        lock(&self.reject_reason).clone()
    }

    /// `/ipam/prefixes/{id}/available-ips/` -> `{id}`
    fn available_ips_prefix(path: &str) -> Option<u64> {
        let rest = path.strip_suffix("/available-ips/")?;
        let (_, id) = rest.rsplit_once('/')?;
        id.parse().ok()
    }
}

#[async_trait::async_trait]
impl NetBoxTransport for MockTransport {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.record_call(Call::Get {
            path: path.to_string(),
            filters: filters.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
        });

        if let Some(prefix_id) = Self::available_ips_prefix(path) {
            let ips = lock(&self.available_ips).get(&prefix_id).cloned().unwrap_or_default();
            return Ok(helpers::page(ips, filters));
        }

        let matching: Vec<Record> = self
            .records(path)
            .into_iter()
            .filter(|record| helpers::matches(record, filters))
            .collect();
        Ok(helpers::page(matching, filters))
    }

    async fn post(&self, path: &str, body: &Fields) -> Result<Record, NetBoxError> {
        self.record_call(Call::Post { path: path.to_string(), body: body.clone() });
        if let Some(reason) = self.rejection() {
            return Err(NetBoxError::Create(format!("POST {} rejected: {}", path, reason)));
        }

        let id = self.next_id();
        let record = self.helpers().create_record(path, id, body);
        lock(&self.collections)
            .entry(path.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn patch(&self, path: &str, id: u64, body: &Fields) -> Result<Record, NetBoxError> {
        self.record_call(Call::Patch { path: path.to_string(), id, body: body.clone() });
        if let Some(reason) = self.rejection() {
            return Err(NetBoxError::Update(format!("PATCH {}{}/ rejected: {}", path, id, reason)));
        }

        let mut collections = lock(&self.collections);
        let record = collections
            .get_mut(path)
            .and_then(|records| records.iter_mut().find(|r| r.id() == Some(id)))
            .ok_or_else(|| NetBoxError::Update(format!("PATCH {}{}/ failed: 404 Not Found", path, id)))?;
        *record = self.helpers().patch_record(record, body);
        Ok(record.clone())
    }

    async fn delete(&self, path: &str, id: u64) -> Result<(), NetBoxError> {
        self.record_call(Call::Delete { path: path.to_string(), id });
        if let Some(reason) = self.rejection() {
            return Err(NetBoxError::Delete(format!("DELETE {}{}/ rejected: {}", path, id, reason)));
        }

        let mut collections = lock(&self.collections);
        let records = collections.get_mut(path).ok_or_else(|| {
            NetBoxError::Delete(format!("DELETE {}{}/ failed: 404 Not Found", path, id))
        })?;
        let before = records.len();
        records.retain(|r| r.id() != Some(id));
        if records.len() == before {
            return Err(NetBoxError::Delete(format!("DELETE {}{}/ failed: 404 Not Found", path, id)));
        }
        Ok(())
    }
}
