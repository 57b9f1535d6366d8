//! Resource descriptors for the NetBox IPAM endpoints
//!
//! Every IPAM resource family is the same shape: a collection endpoint, a
//! handful of fields required on create, and one field used to find a
//! record's id from a human identifier. The table at the bottom of this module
//! is the single source of that metadata.

use crate::error::NetBoxError;
use crate::record::Fields;
use ipnetwork::IpNetwork;
use serde_json::Value;
use std::net::IpAddr;
use std::str::FromStr;

/// Validation applied to a required field before a create is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// JSON string
    Text,
    /// JSON integer
    Integer,
    /// Integer id of another NetBox object
    Reference,
    /// CIDR network with no host bits set (see [`parse_strict_network`])
    StrictNetwork,
}

/// A field that must be supplied when creating a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub rule: FieldRule,
}

impl FieldSpec {
    pub const fn new(name: &'static str, rule: FieldRule) -> Self {
        Self { name, rule }
    }

    fn check(&self, resource: &str, value: Option<&Value>) -> Result<(), NetBoxError> {
        let value = value.ok_or_else(|| {
            NetBoxError::InvalidInput(format!("{} requires field '{}'", resource, self.name))
        })?;

        let ok = match self.rule {
            FieldRule::Text => value.is_string(),
            FieldRule::Integer | FieldRule::Reference => value.is_u64() || value.is_i64(),
            FieldRule::StrictNetwork => {
                let text = value.as_str().ok_or_else(|| {
                    NetBoxError::InvalidInput(format!(
                        "{} field '{}' must be a CIDR string, got {}",
                        resource, self.name, value
                    ))
                })?;
                parse_strict_network(text)?;
                true
            }
        };

        if ok {
            Ok(())
        } else {
            Err(NetBoxError::InvalidInput(format!(
                "{} field '{}' has the wrong type ({:?} expected), got {}",
                resource, self.name, self.rule, value
            )))
        }
    }
}

/// How a human identifier is turned into a record id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupKey {
    /// Record field holding the identifier (e.g. `name`, `vid`)
    pub field: &'static str,
    /// Query parameter used to search for it. NetBox has no exact-match
    /// filter for addresses and prefixes, so those go through `q`.
    pub param: &'static str,
}

/// Metadata for one resource family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Human label, used in logs and errors
    pub name: &'static str,
    /// Collection path relative to the API root, with leading and trailing slash
    pub collection_path: &'static str,
    /// Fields that must be present on create, in wire order
    pub required_fields: &'static [FieldSpec],
    pub lookup: LookupKey,
}

impl ResourceDescriptor {
    /// Path of a nested endpoint under a record, e.g. `available-ips`
    pub fn nested_path(&self, id: u64, endpoint: &str) -> String {
        format!("{}{}/", detail_path(self.collection_path, id), endpoint.trim_matches('/'))
    }

    /// Check that `required` carries every required field and that each
    /// value passes its rule.
    pub fn validate(&self, required: &Fields) -> Result<(), NetBoxError> {
        for spec in self.required_fields {
            spec.check(self.name, required.get(spec.name))?;
        }
        Ok(())
    }
}

/// Path of a single record: `/ipam/vlans/` + 42 -> `/ipam/vlans/42/`
pub fn detail_path(collection_path: &str, id: u64) -> String {
    format!("{}/{}/", collection_path.trim_end_matches('/'), id)
}

/// Parse a CIDR network, rejecting anything not already in network form.
///
/// `10.0.0.0/24` and `2001:db8::/32` pass; `10.0.0.1/24` fails because host
/// bits are set. A bare address is a host network (`/32` or `/128`).
pub fn parse_strict_network(prefix: &str) -> Result<IpNetwork, NetBoxError> {
    let invalid = |reason: &str| NetBoxError::InvalidInput(format!("'{}' {}", prefix, reason));

    // ipnetwork pads short IPv4 forms like "10/8"; require a full address
    let (address, length) = match prefix.split_once('/') {
        Some((address, length)) => (address, Some(length)),
        None => (prefix, None),
    };
    IpAddr::from_str(address).map_err(|_| invalid("is not a valid IP network"))?;

    // Prefix lengths are plain digits ("+24" parses as a u8); dotted netmasks pass through
    if let Some(length) = length {
        if !length.contains('.') && !length.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("has an invalid prefix length"));
        }
    }

    let network = IpNetwork::from_str(prefix).map_err(|_| invalid("is not a valid IP network"))?;
    if network.ip() != network.network() {
        return Err(invalid("has host bits set"));
    }
    Ok(network)
}

/// IP addresses: `/ipam/ip-addresses/`
pub const IP_ADDRESSES: ResourceDescriptor = ResourceDescriptor {
    name: "IP address",
    collection_path: "/ipam/ip-addresses/",
    required_fields: &[FieldSpec::new("address", FieldRule::Text)],
    lookup: LookupKey { field: "address", param: "q" },
};

/// Prefixes: `/ipam/prefixes/`
pub const PREFIXES: ResourceDescriptor = ResourceDescriptor {
    name: "prefix",
    collection_path: "/ipam/prefixes/",
    required_fields: &[FieldSpec::new("prefix", FieldRule::StrictNetwork)],
    lookup: LookupKey { field: "prefix", param: "q" },
};

/// VRFs: `/ipam/vrfs/`
pub const VRFS: ResourceDescriptor = ResourceDescriptor {
    name: "VRF",
    collection_path: "/ipam/vrfs/",
    required_fields: &[
        FieldSpec::new("name", FieldRule::Text),
        FieldSpec::new("rd", FieldRule::Text),
    ],
    lookup: LookupKey { field: "name", param: "name" },
};

/// Aggregates: `/ipam/aggregates/`
pub const AGGREGATES: ResourceDescriptor = ResourceDescriptor {
    name: "aggregate",
    collection_path: "/ipam/aggregates/",
    required_fields: &[
        FieldSpec::new("prefix", FieldRule::StrictNetwork),
        FieldSpec::new("rir", FieldRule::Reference),
    ],
    lookup: LookupKey { field: "prefix", param: "prefix" },
};

/// RIRs: `/ipam/rirs/`
pub const RIRS: ResourceDescriptor = ResourceDescriptor {
    name: "RIR",
    collection_path: "/ipam/rirs/",
    required_fields: &[
        FieldSpec::new("name", FieldRule::Text),
        FieldSpec::new("slug", FieldRule::Text),
    ],
    lookup: LookupKey { field: "name", param: "name" },
};

/// Prefix/VLAN roles: `/ipam/roles/`
pub const PREFIX_ROLES: ResourceDescriptor = ResourceDescriptor {
    name: "prefix role",
    collection_path: "/ipam/roles/",
    required_fields: &[
        FieldSpec::new("name", FieldRule::Text),
        FieldSpec::new("slug", FieldRule::Text),
    ],
    lookup: LookupKey { field: "name", param: "name" },
};

/// VLANs: `/ipam/vlans/`, looked up by VLAN id (`vid`)
pub const VLANS: ResourceDescriptor = ResourceDescriptor {
    name: "VLAN",
    collection_path: "/ipam/vlans/",
    required_fields: &[
        FieldSpec::new("vid", FieldRule::Integer),
        FieldSpec::new("name", FieldRule::Text),
    ],
    lookup: LookupKey { field: "vid", param: "vid" },
};

/// Every IPAM resource family
pub const ALL: [&ResourceDescriptor; 7] = [
    &IP_ADDRESSES,
    &PREFIXES,
    &VRFS,
    &AGGREGATES,
    &RIRS,
    &PREFIX_ROLES,
    &VLANS,
];
