//! Network Provider Port
//!
//! Defines the interface to the virtual-network and load-balancing plane:
//! looking up or creating networks and allocating the public frontend.
//! Lookups never create anything; creation applies the caller's plan.

use crate::domain::entities::{FrontendRecord, NetworkHandle};
use crate::domain::errors::ComposeResult;
use crate::domain::value_objects::{BoundaryId, NetworkId, RoutingClass};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Construction plan for a new virtual network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPlan {
    pub name: String,
    /// Availability zones to spread subnet groups across.
    pub availability_zones: u8,
    /// NAT egress paths for the private-routed groups.
    pub nat_gateways: u8,
    pub subnet_groups: Vec<SubnetGroupPlan>,
}

/// One subnet group of a network plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetGroupPlan {
    pub name: String,
    pub class: RoutingClass,
    /// Prefix length of each subnet's address block.
    pub cidr_mask: u8,
}

/// Request to allocate the load-balancing frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendSpec {
    pub name: String,
    pub network: NetworkId,
    /// Subnets the frontend is placed in (the network's public group).
    pub subnet_ids: Vec<String>,
    pub boundary: BoundaryId,
    pub listener_port: u16,
    pub internet_facing: bool,
}

/// Access to the virtual-network plane of the external platform.
///
/// This is an outbound port: the resolver and composer call it to obtain
/// network handles and the frontend without knowing how the platform
/// allocates them.
#[async_trait]
pub trait NetworkProvider: Send + Sync {
    /// Look up an existing network by identifier.
    async fn find_by_id(&self, id: &NetworkId) -> ComposeResult<Option<NetworkHandle>>;

    /// All networks whose name tag matches. The caller decides what more
    /// than one match means; the provider never picks.
    async fn find_by_tag(&self, tag: &str) -> ComposeResult<Vec<NetworkHandle>>;

    /// Create a new network following the plan. May fail with `Quota`.
    async fn create_network(&self, plan: &NetworkPlan) -> ComposeResult<NetworkHandle>;

    /// Allocate the load-balancing frontend in the given subnets.
    async fn provision_frontend(&self, spec: &FrontendSpec) -> ComposeResult<FrontendRecord>;
}
