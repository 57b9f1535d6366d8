//! Helper functions for building and filtering mock NetBox records

use crate::record::{Fields, Record};
use serde_json::{Map, Value};

/// Helper functions for stamping records the way NetBox does
#[derive(Debug)]
pub struct Helpers {
    base_url: String,
}

impl Helpers {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Build a stored record from a create body: `id` first, then the body
    /// fields, then the server-side `url`, `display` and timestamps.
    pub fn create_record(&self, path: &str, id: u64, body: &Fields) -> Record {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::from(id));
        for (key, value) in body {
            map.insert(key.clone(), value.clone());
        }
        map.insert("url".to_string(), Value::String(self.detail_url(path, id)));
        let display = display_for(&map).unwrap_or_else(|| id.to_string());
        map.insert("display".to_string(), Value::String(display));
        let now = chrono::Utc::now().to_rfc3339();
        map.insert("created".to_string(), Value::String(now.clone()));
        map.insert("last_updated".to_string(), Value::String(now));
        Record::from(map)
    }

    /// Apply a PATCH body on top of an existing record
    pub fn patch_record(&self, record: &Record, body: &Fields) -> Record {
        let mut map = record.fields().clone();
        for (key, value) in body {
            map.insert(key.clone(), value.clone());
        }
        map.insert(
            "last_updated".to_string(),
            Value::String(chrono::Utc::now().to_rfc3339()),
        );
        Record::from(map)
    }

    /// Helper to create an available-ips entry
    pub fn available_ip(&self, address: &str) -> Record {
        let mut map = Map::new();
        map.insert("family".to_string(), Value::from(if address.contains(':') { 6 } else { 4 }));
        map.insert("address".to_string(), Value::String(address.to_string()));
        map.insert("vrf".to_string(), Value::Null);
        Record::from(map)
    }

    fn detail_url(&self, path: &str, id: u64) -> String {
        format!("{}/api{}{}/", self.base_url, path, id)
    }
}

fn display_for(map: &Map<String, Value>) -> Option<String> {
    ["name", "address", "prefix"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Simplified NetBox filtering.
///
/// `q` is a case-insensitive substring search over string fields. Any other
/// key must match the field's value rendered as a string; for nested objects
/// the `id`, `name` or `slug` may match. `limit` and `offset` are paging, not
/// filters. Records without the filtered field never match.
pub fn matches(record: &Record, filters: &[(&str, &str)]) -> bool {
    filters.iter().all(|(key, wanted)| match *key {
        "limit" | "offset" => true,
        "q" => {
            let needle = wanted.to_lowercase();
            record
                .fields()
                .values()
                .filter_map(Value::as_str)
                .any(|s| s.to_lowercase().contains(&needle))
        }
        field => record.get(field).is_some_and(|value| value_matches(value, wanted)),
    })
}

fn value_matches(value: &Value, wanted: &str) -> bool {
    match value {
        Value::String(s) => s == wanted,
        Value::Number(n) => n.to_string() == wanted,
        Value::Bool(b) => b.to_string() == wanted,
        Value::Object(nested) => ["id", "name", "slug"]
            .iter()
            .filter_map(|key| nested.get(*key))
            .any(|v| value_matches(v, wanted)),
        Value::Null | Value::Array(_) => false,
    }
}

/// Apply `offset` and `limit` query parameters
pub fn page(records: Vec<Record>, filters: &[(&str, &str)]) -> Vec<Record> {
    let param = |name: &str| {
        filters
            .iter()
            .find(|(key, _)| *key == name)
            .and_then(|(_, value)| value.parse::<usize>().ok())
    };
    let offset = param("offset").unwrap_or(0);
    let limit = param("limit").unwrap_or(usize::MAX);
    records.into_iter().skip(offset).take(limit).collect()
}
