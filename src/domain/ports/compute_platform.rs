//! Compute Platform Port
//!
//! Defines the interface to the container orchestration engine. The engine
//! owns task lifecycle, scaling, and log delivery; this crate only hands it
//! a service specification and receives the running endpoints back.

use crate::domain::entities::ServiceRecord;
use crate::domain::errors::ComposeResult;
use crate::domain::value_objects::{BoundaryId, LogDelivery, NetworkId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Specification of a container service to launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub cluster_name: String,
    pub service_name: String,
    /// Container image reference, e.g. `nginx:stable`.
    pub image: String,
    pub cpu: u32,
    pub memory_mib: u32,
    pub container_port: u16,
    pub desired_count: u32,
    pub network: NetworkId,
    /// Subnets the tasks run in (the network's private-routed group).
    pub subnet_ids: Vec<String>,
    pub boundary: BoundaryId,
    /// Tasks never get public addresses; they are reached through the
    /// frontend only.
    pub assign_public_address: bool,
    pub log_delivery: LogDelivery,
}

/// Access to the container orchestration engine.
#[async_trait]
pub trait ComputePlatform: Send + Sync {
    /// Launch a service and report its running endpoints.
    async fn launch_service(&self, spec: &ServiceSpec) -> ComposeResult<ServiceRecord>;
}
