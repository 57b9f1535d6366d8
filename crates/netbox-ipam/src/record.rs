//! Records returned by NetBox and field maps sent to it
//!
//! NetBox objects are kept opaque: the client only ever reads `id` (and
//! `address` from the available-ips endpoint). Everything else passes through
//! untouched, so a record serializes back to exactly what the server sent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single object returned by the NetBox API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Server-assigned id, if the record carries an integer `id`
    pub fn id(&self) -> Option<u64> {
        self.0.get("id").and_then(Value::as_u64)
    }

    /// Raw value of a field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Value of a string field
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// All fields of the record
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// True if every field in `fields` is present here with an equal value
    pub fn contains(&self, fields: &Fields) -> bool {
        fields.iter().all(|(k, v)| self.0.get(k) == Some(v))
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Ordered, string-keyed request body for create and update calls.
///
/// Keys keep insertion order on the wire. Inserting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    ///
    /// ```
    /// use netbox_ipam::Fields;
    ///
    /// let fields = Fields::new()
    ///     .with("description", "core uplinks")
    ///     .with("is_pool", true);
    /// assert_eq!(fields.len(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Fields {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_id_and_passthrough() {
        let value = json!({"id": 7, "name": "red", "rd": "65000:1", "tags": []});
        let record: Record = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(record.id(), Some(7));
        assert_eq!(record.get_str("name"), Some("red"));
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    #[test]
    fn test_record_without_integer_id() {
        let record: Record = serde_json::from_value(json!({"id": "seven"})).unwrap();
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let fields = Fields::new().with("name", "red").with("rd", "65000:1").with("description", "x");
        let body = serde_json::to_string(&fields).unwrap();
        assert_eq!(body, r#"{"name":"red","rd":"65000:1","description":"x"}"#);
    }

    #[test]
    fn test_record_contains_fields() {
        let record: Record = serde_json::from_value(json!({"id": 1, "vid": 100, "name": "mgmt"})).unwrap();
        assert!(record.contains(&Fields::new().with("vid", 100).with("name", "mgmt")));
        assert!(!record.contains(&Fields::new().with("name", "prod")));
    }
}
