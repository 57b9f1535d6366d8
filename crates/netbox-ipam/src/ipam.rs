//! IPAM operations
//!
//! Named operations for the seven IPAM resource families. Each one is a thin
//! delegation to a [`ResourceClient`] built from the descriptor table, so the
//! behaviour (validation, first-match id resolution, error mapping) is the same
//! everywhere.
//!
//! # Example
//!
//! ```no_run
//! use netbox_ipam::{Fields, Ipam, NetBoxClient, NetBoxConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NetBoxClient::new(NetBoxConfig::from_env()?)?;
//! let ipam = Ipam::new(&client);
//!
//! ipam.create_vrf("red", "65000:1", Fields::new()).await?;
//! ipam.create_ip_prefix("10.20.0.0/24", Fields::new().with("description", "red hosts")).await?;
//! let next = ipam.get_next_available_ip(&[("prefix", "10.20.0.0/24")]).await?;
//! ipam.create_ip_address(&next, Fields::new()).await?;
//! # Ok(())
//! # }
//! ```

use crate::descriptor::{self, AGGREGATES, IP_ADDRESSES, PREFIXES, PREFIX_ROLES, RIRS, VLANS, VRFS};
use crate::error::NetBoxError;
use crate::netbox_trait::NetBoxTransport;
use crate::record::{Fields, Record};
use crate::resource::ResourceClient;
use std::fmt;

/// IPAM API over any transport
pub struct Ipam<'a, T: NetBoxTransport + ?Sized> {
    transport: &'a T,
}

impl<T: NetBoxTransport + ?Sized> fmt::Debug for Ipam<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ipam").field("base_url", &self.transport.base_url()).finish()
    }
}

impl<'a, T: NetBoxTransport + ?Sized> Ipam<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    pub fn ip_addresses(&self) -> ResourceClient<'a, T> {
        ResourceClient::new(self.transport, &IP_ADDRESSES)
    }

    pub fn prefixes(&self) -> ResourceClient<'a, T> {
        ResourceClient::new(self.transport, &PREFIXES)
    }

    pub fn vrfs(&self) -> ResourceClient<'a, T> {
        ResourceClient::new(self.transport, &VRFS)
    }

    pub fn aggregates(&self) -> ResourceClient<'a, T> {
        ResourceClient::new(self.transport, &AGGREGATES)
    }

    pub fn rirs(&self) -> ResourceClient<'a, T> {
        ResourceClient::new(self.transport, &RIRS)
    }

    pub fn prefix_roles(&self) -> ResourceClient<'a, T> {
        ResourceClient::new(self.transport, &PREFIX_ROLES)
    }

    pub fn vlans(&self) -> ResourceClient<'a, T> {
        ResourceClient::new(self.transport, &VLANS)
    }

    // IP addresses

    /// Return all IP addresses matching `filters`
    pub async fn get_ip_addresses(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.ip_addresses().list(filters).await
    }

    pub async fn get_ip(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.ip_addresses().list(filters).await
    }

    /// IP addresses assigned to interfaces of the named device
    pub async fn get_ip_by_device(&self, device_name: &str) -> Result<Vec<Record>, NetBoxError> {
        self.ip_addresses().list(&[("device", device_name)]).await
    }

    /// Create an IP address (`address` in CIDR notation, e.g. `10.0.0.5/24`)
    pub async fn create_ip_address(&self, address: &str, extra: Fields) -> Result<Record, NetBoxError> {
        self.ip_addresses().create(Fields::new().with("address", address), extra).await
    }

    /// Update the IP address found by searching for `address`
    pub async fn update_ip(&self, address: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.ip_addresses().update(address, patch).await
    }

    pub async fn delete_ip_address(&self, address: &str) -> Result<(), NetBoxError> {
        self.ip_addresses().delete(address).await
    }

    // Prefixes

    /// Return all prefixes matching `filters`
    pub async fn get_ip_prefixes(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.prefixes().list(filters).await
    }

    pub async fn get_ip_prefix(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.prefixes().list(filters).await
    }

    /// Create a prefix.
    ///
    /// `prefix` must be a network in canonical form; `10.0.0.1/24` is rejected
    /// with [`NetBoxError::InvalidInput`] without contacting NetBox.
    pub async fn create_ip_prefix(&self, prefix: &str, extra: Fields) -> Result<Record, NetBoxError> {
        self.prefixes().create(Fields::new().with("prefix", prefix), extra).await
    }

    pub async fn update_ip_prefix(&self, prefix: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.prefixes().update(prefix, patch).await
    }

    /// Delete the first prefix matching `filters`
    pub async fn delete_ip_prefix(&self, filters: &[(&str, &str)]) -> Result<(), NetBoxError> {
        self.prefixes().delete_where(filters).await
    }

    /// Next available IP address in the first prefix matching `filters`
    pub async fn get_next_available_ip(&self, filters: &[(&str, &str)]) -> Result<String, NetBoxError> {
        self.prefixes().get_next_available(filters).await
    }

    // VRFs

    pub async fn get_vrfs(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.vrfs().list(filters).await
    }

    pub async fn get_vrf(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.vrfs().list(filters).await
    }

    /// Create a VRF with route distinguisher `rd` (any format NetBox accepts)
    pub async fn create_vrf(&self, name: &str, rd: &str, extra: Fields) -> Result<Record, NetBoxError> {
        self.vrfs().create(Fields::new().with("name", name).with("rd", rd), extra).await
    }

    pub async fn update_vrf(&self, name: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.vrfs().update(name, patch).await
    }

    pub async fn delete_vrf(&self, name: &str) -> Result<(), NetBoxError> {
        self.vrfs().delete(name).await
    }

    // Aggregates

    pub async fn get_aggregates(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.aggregates().list(filters).await
    }

    pub async fn get_aggregate(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.aggregates().list(filters).await
    }

    /// Create an aggregate under the RIR named `rir`.
    ///
    /// The prefix is checked before the RIR lookup, so a malformed prefix never
    /// reaches NetBox.
    pub async fn create_aggregate(&self, prefix: &str, rir: &str, extra: Fields) -> Result<Record, NetBoxError> {
        descriptor::parse_strict_network(prefix)?;
        let rir_id = self.rirs().resolve_id(&[("name", rir)]).await?;
        let required = Fields::new().with("prefix", prefix).with("rir", rir_id);
        self.aggregates().create(required, extra).await
    }

    pub async fn update_aggregate(&self, prefix: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.aggregates().update(prefix, patch).await
    }

    pub async fn delete_aggregate(&self, prefix: &str) -> Result<(), NetBoxError> {
        self.aggregates().delete(prefix).await
    }

    // RIRs

    pub async fn get_rirs(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.rirs().list(filters).await
    }

    pub async fn get_rir(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.rirs().list(filters).await
    }

    pub async fn create_rir(&self, name: &str, slug: &str, extra: Fields) -> Result<Record, NetBoxError> {
        self.rirs().create(Fields::new().with("name", name).with("slug", slug), extra).await
    }

    pub async fn update_rir(&self, name: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.rirs().update(name, patch).await
    }

    pub async fn delete_rir(&self, name: &str) -> Result<(), NetBoxError> {
        self.rirs().delete(name).await
    }

    // Prefix roles

    pub async fn get_prefix_roles(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.prefix_roles().list(filters).await
    }

    pub async fn get_prefix_role(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.prefix_roles().list(filters).await
    }

    pub async fn create_prefix_role(&self, name: &str, slug: &str, extra: Fields) -> Result<Record, NetBoxError> {
        self.prefix_roles().create(Fields::new().with("name", name).with("slug", slug), extra).await
    }

    pub async fn update_prefix_role(&self, name: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.prefix_roles().update(name, patch).await
    }

    pub async fn delete_prefix_role(&self, name: &str) -> Result<(), NetBoxError> {
        self.prefix_roles().delete(name).await
    }

    // VLANs
    //
    // VLANs are looked up by VLAN id. Name-based lookup is available through
    // the explicit *_by_name variants.

    pub async fn get_vlans(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.vlans().list(filters).await
    }

    pub async fn get_vlan(&self, filters: &[(&str, &str)]) -> Result<Vec<Record>, NetBoxError> {
        self.vlans().list(filters).await
    }

    pub async fn create_vlan(&self, vid: u16, name: &str, extra: Fields) -> Result<Record, NetBoxError> {
        self.vlans().create(Fields::new().with("vid", vid).with("name", name), extra).await
    }

    /// Update the VLAN with VLAN id `vid`
    pub async fn update_vlan(&self, vid: u16, patch: Fields) -> Result<Record, NetBoxError> {
        self.vlans().update(&vid.to_string(), patch).await
    }

    /// Delete the VLAN with VLAN id `vid`
    pub async fn delete_vlan(&self, vid: u16) -> Result<(), NetBoxError> {
        self.vlans().delete(&vid.to_string()).await
    }

    pub async fn update_vlan_by_name(&self, name: &str, patch: Fields) -> Result<Record, NetBoxError> {
        self.vlans().update_where(&[("name", name)], patch).await
    }

    pub async fn delete_vlan_by_name(&self, name: &str) -> Result<(), NetBoxError> {
        self.vlans().delete_where(&[("name", name)]).await
    }
}
