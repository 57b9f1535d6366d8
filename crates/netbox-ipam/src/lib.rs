//! NetBox IPAM REST API Client
//!
//! A Rust client library for the IPAM part of the NetBox REST API: IP
//! addresses, prefixes, VRFs, aggregates, RIRs, prefix roles and VLANs.
//!
//! Every resource family is described by a [`ResourceDescriptor`] and served
//! by the same generic [`ResourceClient`]; [`Ipam`] exposes the named
//! operations on top of it.
//!
//! # Example
//!
//! ```no_run
//! use netbox_ipam::{Fields, NetBoxClient, NetBoxConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = NetBoxClient::new(NetBoxConfig::new("http://netbox:80", "your-api-token"))?;
//! let ipam = client.ipam();
//!
//! // Create a prefix (host bits set are rejected locally)
//! ipam.create_ip_prefix("192.168.1.0/24", Fields::new().with("status", "active")).await?;
//!
//! // Grab the next free address in it
//! let address = ipam.get_next_available_ip(&[("prefix", "192.168.1.0/24")]).await?;
//! ipam.create_ip_address(&address, Fields::new().with("description", "PXE boot server")).await?;
//!
//! // Delete a VLAN by VLAN id
//! ipam.delete_vlan(100).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Descriptor table**: one generic client for all seven IPAM collections
//! - **Strict CIDR validation**: malformed prefixes never reach NetBox
//! - **Id resolution**: update/delete by name, address or VLAN id (first match wins)
//! - **Pagination**: list calls follow `next` links unless a `limit` is given
//! - **Mocking**: `MockTransport` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ipam;
pub mod record;
pub mod resource;
#[path = "trait.rs"]
pub mod netbox_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::NetBoxClient;
pub use common::{HttpClient, PaginatedResponse};
pub use config::NetBoxConfig;
pub use descriptor::{FieldRule, FieldSpec, LookupKey, ResourceDescriptor};
pub use error::NetBoxError;
pub use ipam::Ipam;
pub use netbox_trait::NetBoxTransport;
pub use record::{Fields, Record};
pub use resource::ResourceClient;
#[cfg(any(test, feature = "test-util"))]
pub use mock::{Call, MockTransport};
