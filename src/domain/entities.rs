//! Domain Entities - Core topology objects
//!
//! These entities represent the pieces of the constructed topology. They are
//! created once during construction; nothing in this crate updates or deletes
//! them afterwards. Records returned by the external platforms live here too,
//! since downstream components reference them by identity.

use crate::domain::errors::{ComposeError, ComposeResult};
use crate::domain::value_objects::{
    AppProtocol, BoundaryId, MutationHook, NetworkId, OriginAddress, RoutingClass, RuleSource,
    ServiceId, TargetId, TransportProtocol, ViewerProtocolPolicy,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Opaque reference to a resolved virtual network.
///
/// Exactly one handle exists per deployment. It is immutable once resolved
/// and shared read-only by every downstream component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkHandle {
    pub id: NetworkId,
    /// Subnet groups in platform order, each tagged with a routing class.
    pub subnet_groups: Vec<SubnetGroup>,
}

impl NetworkHandle {
    /// First subnet group with the given routing class.
    pub fn subnet_group(&self, class: RoutingClass) -> Option<&SubnetGroup> {
        self.subnet_groups.iter().find(|g| g.class == class)
    }

    /// Whether any subnet group carries the given routing class.
    pub fn has_class(&self, class: RoutingClass) -> bool {
        self.subnet_group(class).is_some()
    }
}

/// A named group of subnets sharing one routing class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetGroup {
    pub name: String,
    pub class: RoutingClass,
    pub subnet_ids: Vec<String>,
}

/// A single ingress allow rule on a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    pub protocol: TransportProtocol,
    pub port: u16,
    pub source: RuleSource,
    pub description: String,
}

/// Named ingress rule set attached to a network-addressable resource group.
///
/// Boundaries only declare rules; enforcement belongs to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityBoundary {
    pub id: BoundaryId,
    pub network: NetworkId,
    pub description: String,
    pub ingress: Vec<IngressRule>,
}

impl SecurityBoundary {
    pub fn new(
        name: impl Into<String>,
        network: NetworkId,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: BoundaryId::new(name),
            network,
            description: description.into(),
            ingress: Vec::new(),
        }
    }

    /// Allow inbound traffic on a port from any origin.
    pub fn allow_from_anywhere(
        &mut self,
        protocol: TransportProtocol,
        port: u16,
        description: impl Into<String>,
    ) {
        self.ingress.push(IngressRule {
            protocol,
            port,
            source: RuleSource::Anywhere,
            description: description.into(),
        });
    }

    /// Allow inbound traffic on a port only from another boundary, referenced
    /// by its identity rather than an address range.
    pub fn allow_from_boundary(
        &mut self,
        source: BoundaryId,
        protocol: TransportProtocol,
        port: u16,
        description: impl Into<String>,
    ) {
        self.ingress.push(IngressRule {
            protocol,
            port,
            source: RuleSource::Boundary(source),
            description: description.into(),
        });
    }

    /// Whether every ingress rule admits only the given boundary.
    ///
    /// This is the structural form of the compute-isolation invariant: it is
    /// checkable by inspecting the declared rule set, with no address
    /// resolution involved.
    pub fn only_admits(&self, source: &BoundaryId) -> bool {
        !self.ingress.is_empty()
            && self
                .ingress
                .iter()
                .all(|rule| matches!(&rule.source, RuleSource::Boundary(id) if id == source))
    }
}

/// Health-check contract declared on a routing target, independent of the
/// service that later backs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub path: String,
    pub interval: Duration,
}

/// Named pool of compute endpoints reachable under one health-check contract.
///
/// A target must be bound to exactly one compute service before any listener
/// rule may reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingTarget {
    pub id: TargetId,
    pub port: u16,
    pub protocol: AppProtocol,
    pub health_check: HealthCheck,
    bound_service: Option<ServiceId>,
    endpoints: Vec<SocketAddr>,
}

impl RoutingTarget {
    pub fn new(
        name: impl Into<String>,
        port: u16,
        protocol: AppProtocol,
        health_check: HealthCheck,
    ) -> Self {
        Self {
            id: TargetId::new(name),
            port,
            protocol,
            health_check,
            bound_service: None,
            endpoints: Vec::new(),
        }
    }

    /// Register a compute service as the backing of this target.
    ///
    /// The service's current endpoints are registered here; keeping the set
    /// current as the service scales is the compute platform's job. Binding
    /// an already-bound target is a conflict.
    pub fn bind_service(&mut self, service: &ServiceRecord) -> ComposeResult<()> {
        if let Some(existing) = &self.bound_service {
            return Err(ComposeError::Conflict(format!(
                "routing target '{}' is already bound to service '{}'",
                self.id, existing
            )));
        }
        self.bound_service = Some(service.id.clone());
        self.endpoints = service.endpoints.clone();
        tracing::debug!(
            "bound service {} to target {} ({} endpoints)",
            service.id,
            self.id,
            self.endpoints.len()
        );
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.bound_service.is_some()
    }

    pub fn bound_service(&self) -> Option<&ServiceId> {
        self.bound_service.as_ref()
    }

    pub fn endpoints(&self) -> &[SocketAddr] {
        &self.endpoints
    }
}

/// A running compute service, as reported back by the compute platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub id: ServiceId,
    pub cluster: String,
    /// Endpoints currently running, one per replica.
    pub endpoints: Vec<SocketAddr>,
}

/// The load-balancing frontend, as allocated by the network platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendRecord {
    pub id: String,
    pub name: String,
    /// Publicly resolvable address of the frontend.
    pub public_address: String,
    pub listener_port: u16,
}

/// Edge cache distribution fronting the load-balancing frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDistribution {
    pub id: String,
    /// Public domain name served by the edge platform.
    pub domain_name: String,
    /// Exactly one origin, referenced by network address.
    pub origin: OriginAddress,
    pub viewer_policy: ViewerProtocolPolicy,
    /// Request mutation hooks, applied in order per viewer request.
    pub hooks: Vec<MutationHook>,
}

/// An identity directory (hosted user pool), as created by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    pub id: String,
    pub name: String,
}

/// A client registration within an identity directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: String,
    pub directory_id: String,
}
