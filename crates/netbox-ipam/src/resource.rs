//! Generic client for one NetBox resource collection
//!
//! A [`ResourceClient`] pairs a [`ResourceDescriptor`] with a transport and
//! turns list/create/update/delete calls into requests against the
//! descriptor's collection path.
//!
//! Update and delete take a human identifier (name, address, VLAN id) or a
//! filter set, resolve it to the record id with one GET, and then send the
//! mutation. When the lookup matches several records the first one wins; when
//! it matches none the call fails with [`NetBoxError::NotFound`] and no
//! mutation is sent. Resolved ids are never cached.

use crate::descriptor::ResourceDescriptor;
use crate::error::NetBoxError;
use crate::netbox_trait::NetBoxTransport;
use crate::record::{Fields, Record};
use std::fmt;
use tracing::{debug, info, warn};

/// Client for a single resource family
pub struct ResourceClient<'a, T: NetBoxTransport + ?Sized> {
    transport: &'a T,
    descriptor: &'static ResourceDescriptor,
}

impl<T: NetBoxTransport + ?Sized> Clone for ResourceClient<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: NetBoxTransport + ?Sized> Copy for ResourceClient<'_, T> {}

impl<T: NetBoxTransport + ?Sized> fmt::Debug for ResourceClient<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.transport.base_url())
            .field("descriptor", self.descriptor)
            .finish()
    }
}

impl<'a, T: NetBoxTransport + ?Sized> ResourceClient<'a, T> {
    /// Create a client for `descriptor` over `transport`
    pub fn new(transport: &'a T, descriptor: &'static ResourceDescriptor) -> Self {
        Self { transport, descriptor }
    }

    /// List records matching `filters`.
    ///
    /// Filters go to NetBox as query parameters; nothing is filtered locally.
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        debug!("Querying {} records with filters: {:?}", self.descriptor.name, filters);
        self.transport.get(self.descriptor.collection_path, filters).await
    }

    /// Create a record.
    ///
    /// `required` must carry every field the descriptor requires, each passing
    /// its rule; otherwise [`NetBoxError::InvalidInput`] is returned before any
    /// request is sent. `extra` adds optional fields. Required fields take
    /// precedence: an `extra` entry with the same name as a required field is
    /// dropped.
    ///
    /// # Returns
    /// * `Ok(Record)` - The created record as returned by NetBox
    /// * `Err(NetBoxError)` - Validation failure or a rejected POST
    pub async fn create(&self, required: Fields, extra: Fields) -> Result<Record, NetBoxError> {
        self.descriptor.validate(&required)?;
        let body = self.merge_body(required, extra);

        debug!("Creating {} with {} field(s)", self.descriptor.name, body.len());
        let record = self.transport.post(self.descriptor.collection_path, &body).await?;
        info!("Created {} {:?}", self.descriptor.name, record.id());
        Ok(record)
    }

    /// Update the record whose lookup field matches `identifier`
    pub async fn update(&self, identifier: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.log_lookup(identifier);
        self.update_where(&[(self.descriptor.lookup.param, identifier)], patch).await
    }

    /// Update the first record matching `filters`
    pub async fn update_where(&self, filters: &[(&str, &str)], patch: Fields) -> Result<Record, NetBoxError> {
        let id = self.resolve_id(filters).await?;
        let record = self.transport.patch(self.descriptor.collection_path, id, &patch).await?;
        info!("Updated {} {}", self.descriptor.name, id);
        Ok(record)
    }

    /// Delete the record whose lookup field matches `identifier`
    pub async fn delete(&self, identifier: &str) -> Result<(), NetBoxError> {
        self.log_lookup(identifier);
        self.delete_where(&[(self.descriptor.lookup.param, identifier)]).await
    }

    /// Delete the first record matching `filters`
    pub async fn delete_where(&self, filters: &[(&str, &str)]) -> Result<(), NetBoxError> {
        let id = self.resolve_id(filters).await?;
        self.transport.delete(self.descriptor.collection_path, id).await?;
        info!("Deleted {} {}", self.descriptor.name, id);
        Ok(())
    }

    /// Resolve `filters` to the id of the first matching record
    pub async fn resolve_id(&self, filters: &[(&str, &str)]) -> Result<u64, NetBoxError> {
        let records = self.list(filters).await?;
        let first = records.first().ok_or_else(|| {
            NetBoxError::NotFound(format!("No {} matches {:?}", self.descriptor.name, filters))
        })?;

        if records.len() > 1 {
            warn!(
                "{} {} records match {:?}; using the first",
                records.len(),
                self.descriptor.name,
                filters
            );
        }

        first.id().ok_or_else(|| {
            NetBoxError::Api(format!(
                "{} record matching {:?} has no integer id",
                self.descriptor.name, filters
            ))
        })
    }

    /// Next free address under the first record matching `filters`.
    ///
    /// Only meaningful for prefixes: reads
    /// `collection_path/{id}/available-ips/` with `limit=1` and returns the
    /// `address` of the single result.
    pub async fn get_next_available(&self, filters: &[(&str, &str)]) -> Result<String, NetBoxError> {
        let id = self.resolve_id(filters).await?;
        let path = self.descriptor.nested_path(id, "available-ips");

        debug!("Fetching next available IP from {} {}", self.descriptor.name, id);
        let available = self.transport.get(&path, &[("limit", "1")]).await?;
        let first = available.first().ok_or_else(|| {
            NetBoxError::NotFound(format!("No available IPs in {} {}", self.descriptor.name, id))
        })?;

        first
            .get_str("address")
            .map(str::to_string)
            .ok_or_else(|| NetBoxError::Api(format!("Available IP entry from {} has no address", path)))
    }

    fn log_lookup(&self, identifier: &str) {
        let lookup = self.descriptor.lookup;
        debug!(
            "Resolving {} by {} '{}' (query parameter '{}')",
            self.descriptor.name, lookup.field, identifier, lookup.param
        );
    }

    /// Required fields in descriptor order, then any other required entries,
    /// then extras that don't collide.
    fn merge_body(&self, required: Fields, extra: Fields) -> Fields {
        let mut body = Fields::new();
        for spec in self.descriptor.required_fields {
            if let Some(value) = required.get(spec.name) {
                body.insert(spec.name, value.clone());
            }
        }
        for (key, value) in required.into_inner() {
            if !body.contains_key(&key) {
                body.insert(key, value);
            }
        }
        for (key, value) in extra.into_inner() {
            if body.contains_key(&key) {
                warn!(
                    "Ignoring extra field '{}' for {}: required value takes precedence",
                    key, self.descriptor.name
                );
                continue;
            }
            body.insert(key, value);
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{PREFIXES, VLANS, VRFS};
    use crate::mock::{Call, MockTransport};
    use serde_json::json;

    fn vrf_fields(name: &str, rd: &str) -> Fields {
        Fields::new().with("name", name).with("rd", rd)
    }

    #[tokio::test]
    async fn test_list_passes_filters_through() {
        let mock = MockTransport::new("http://test-netbox");
        mock.add_record(VRFS.collection_path, json!({"name": "red", "rd": "65000:1"}));
        mock.add_record(VRFS.collection_path, json!({"name": "blue", "rd": "65000:2"}));
        let vrfs = ResourceClient::new(&mock, &VRFS);

        let found = vrfs.list(&[("name", "blue")]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].get_str("rd"), Some("65000:2"));

        assert!(vrfs.list(&[("name", "green")]).await.unwrap().is_empty());
        assert_eq!(
            mock.calls()[0],
            Call::Get {
                path: "/ipam/vrfs/".to_string(),
                filters: vec![("name".to_string(), "blue".to_string())],
            }
        );
    }

    #[tokio::test]
    async fn test_create_posts_required_fields() {
        let mock = MockTransport::new("http://test-netbox");
        let vrfs = ResourceClient::new(&mock, &VRFS);

        let created = vrfs.create(vrf_fields("red", "65000:1"), Fields::new()).await.unwrap();

        assert!(created.id().is_some());
        assert_eq!(
            mock.calls(),
            vec![Call::Post { path: "/ipam/vrfs/".to_string(), body: vrf_fields("red", "65000:1") }]
        );
    }

    #[tokio::test]
    async fn test_create_required_fields_win_over_extra() {
        let mock = MockTransport::new("http://test-netbox");
        let vrfs = ResourceClient::new(&mock, &VRFS);

        let extra = Fields::new().with("rd", "99:99").with("description", "tenant red");
        vrfs.create(vrf_fields("red", "65000:1"), extra).await.unwrap();

        let calls = mock.calls();
        let Call::Post { body, .. } = &calls[0] else {
            panic!("expected a POST");
        };
        assert_eq!(body.get("rd"), Some(&json!("65000:1")));
        assert_eq!(body.get("description"), Some(&json!("tenant red")));
        let keys: Vec<&str> = body.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["name", "rd", "description"]);
    }

    #[tokio::test]
    async fn test_create_invalid_prefix_sends_nothing() {
        let mock = MockTransport::new("http://test-netbox");
        let prefixes = ResourceClient::new(&mock, &PREFIXES);

        let result = prefixes.create(Fields::new().with("prefix", "10.0.0.1/24"), Fields::new()).await;

        assert!(matches!(result, Err(NetBoxError::InvalidInput(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_missing_required_field_sends_nothing() {
        let mock = MockTransport::new("http://test-netbox");
        let vrfs = ResourceClient::new(&mock, &VRFS);

        let result = vrfs.create(Fields::new().with("name", "red"), Fields::new().with("rd", "65000:1")).await;

        assert!(matches!(result, Err(NetBoxError::InvalidInput(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_then_list_returns_superset() {
        let mock = MockTransport::new("http://test-netbox");
        let vrfs = ResourceClient::new(&mock, &VRFS);
        let extra = Fields::new().with("enforce_unique", true);

        vrfs.create(vrf_fields("red", "65000:1"), extra.clone()).await.unwrap();
        let found = vrfs.list(&[("name", "red")]).await.unwrap();

        assert_eq!(found.len(), 1);
        assert!(found[0].contains(&vrf_fields("red", "65000:1")));
        assert!(found[0].contains(&extra));
    }

    #[tokio::test]
    async fn test_update_resolves_then_patches() {
        let mock = MockTransport::new("http://test-netbox");
        let red = mock.add_record(VRFS.collection_path, json!({"id": 11, "name": "red", "rd": "65000:1"}));
        let vrfs = ResourceClient::new(&mock, &VRFS);

        let patch = Fields::new().with("description", "updated");
        let updated = vrfs.update("red", patch.clone()).await.unwrap();

        assert_eq!(updated.id(), red.id());
        assert_eq!(updated.get_str("description"), Some("updated"));
        assert_eq!(
            mock.calls(),
            vec![
                Call::Get {
                    path: "/ipam/vrfs/".to_string(),
                    filters: vec![("name".to_string(), "red".to_string())],
                },
                Call::Patch { path: "/ipam/vrfs/".to_string(), id: 11, body: patch },
            ]
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_not_found_send_no_mutation() {
        let mock = MockTransport::new("http://test-netbox");
        let vrfs = ResourceClient::new(&mock, &VRFS);

        let update = vrfs.update("missing", Fields::new().with("description", "x")).await;
        let delete = vrfs.delete("missing").await;

        assert!(matches!(update, Err(NetBoxError::NotFound(_))));
        assert!(matches!(delete, Err(NetBoxError::NotFound(_))));
        assert_eq!(mock.calls().len(), 2);
        assert!(mock.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let mock = MockTransport::new("http://test-netbox");
        mock.add_record(VLANS.collection_path, json!({"id": 42, "vid": 100, "name": "mgmt-a"}));
        mock.add_record(VLANS.collection_path, json!({"id": 43, "vid": 100, "name": "mgmt-b"}));
        let vlans = ResourceClient::new(&mock, &VLANS);

        assert_eq!(vlans.resolve_id(&[("vid", "100")]).await.unwrap(), 42);
        vlans.delete("100").await.unwrap();

        assert_eq!(mock.mutations(), vec![Call::Delete { path: "/ipam/vlans/".to_string(), id: 42 }]);
        assert_eq!(mock.records(VLANS.collection_path).len(), 1);
    }

    #[tokio::test]
    async fn test_every_mutation_does_a_fresh_lookup() {
        let mock = MockTransport::new("http://test-netbox");
        mock.add_record(VRFS.collection_path, json!({"id": 5, "name": "red", "rd": "65000:1"}));
        let vrfs = ResourceClient::new(&mock, &VRFS);

        vrfs.update("red", Fields::new().with("description", "a")).await.unwrap();
        vrfs.update("red", Fields::new().with("description", "b")).await.unwrap();

        let gets = mock.calls().iter().filter(|c| !c.is_mutation()).count();
        assert_eq!(gets, 2);
    }

    #[tokio::test]
    async fn test_resolve_id_without_integer_id() {
        let mock = MockTransport::new("http://test-netbox");
        mock.add_record(VRFS.collection_path, json!({"id": "abc", "name": "red"}));
        let vrfs = ResourceClient::new(&mock, &VRFS);

        assert!(matches!(vrfs.resolve_id(&[("name", "red")]).await, Err(NetBoxError::Api(_))));
    }

    #[tokio::test]
    async fn test_transport_rejection_passes_through() {
        let mock = MockTransport::new("http://test-netbox");
        mock.add_record(VRFS.collection_path, json!({"id": 5, "name": "red", "rd": "65000:1"}));
        mock.reject_mutations("400 Bad Request");
        let vrfs = ResourceClient::new(&mock, &VRFS);

        assert!(matches!(
            vrfs.create(vrf_fields("blue", "65000:2"), Fields::new()).await,
            Err(NetBoxError::Create(_))
        ));
        assert!(matches!(vrfs.update("red", Fields::new()).await, Err(NetBoxError::Update(_))));
        assert!(matches!(vrfs.delete("red").await, Err(NetBoxError::Delete(_))));
    }

    #[tokio::test]
    async fn test_get_next_available_uses_limit_one() {
        let mock = MockTransport::new("http://test-netbox");
        let prefix = mock.add_record(PREFIXES.collection_path, json!({"prefix": "10.0.0.0/24"}));
        let prefix_id = prefix.id().unwrap();
        mock.set_available_ips(prefix_id, &["10.0.0.1/24", "10.0.0.2/24"]);
        let prefixes = ResourceClient::new(&mock, &PREFIXES);

        let address = prefixes.get_next_available(&[("prefix", "10.0.0.0/24")]).await.unwrap();

        assert_eq!(address, "10.0.0.1/24");
        assert_eq!(
            mock.calls()[1],
            Call::Get {
                path: format!("/ipam/prefixes/{}/available-ips/", prefix_id),
                filters: vec![("limit".to_string(), "1".to_string())],
            }
        );
    }

    #[tokio::test]
    async fn test_get_next_available_not_found() {
        let mock = MockTransport::new("http://test-netbox");
        let prefixes = ResourceClient::new(&mock, &PREFIXES);
        assert!(matches!(
            prefixes.get_next_available(&[("prefix", "10.9.0.0/16")]).await,
            Err(NetBoxError::NotFound(_))
        ));

        mock.add_record(PREFIXES.collection_path, json!({"prefix": "10.9.0.0/16"}));
        assert!(matches!(
            prefixes.get_next_available(&[("prefix", "10.9.0.0/16")]).await,
            Err(NetBoxError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_next_available_entry_without_address() {
        let mock = MockTransport::new("http://test-netbox");
        let prefix = mock.add_record(PREFIXES.collection_path, json!({"prefix": "10.0.0.0/24"}));
        let prefix_id = prefix.id().unwrap();
        let entry: Record = serde_json::from_value(json!({"family": 4, "vrf": null})).unwrap();
        mock.available_ips.lock().unwrap().insert(prefix_id, vec![entry]);
        let prefixes = ResourceClient::new(&mock, &PREFIXES);

        let err = prefixes.get_next_available(&[("prefix", "10.0.0.0/24")]).await.unwrap_err();

        assert!(matches!(err, NetBoxError::Api(ref msg) if msg.contains("no address")));
        assert!(mock.mutations().is_empty());
    }
}
