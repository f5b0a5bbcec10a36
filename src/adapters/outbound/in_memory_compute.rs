//! In-Memory Compute Platform
//!
//! Simulates the container orchestration engine: launching a service yields
//! one synthetic private endpoint per desired replica. Task lifecycle and
//! scaling stay out of scope, matching the real platform boundary.

use crate::domain::entities::ServiceRecord;
use crate::domain::errors::ComposeResult;
use crate::domain::ports::{ComputePlatform, ServiceSpec};
use crate::domain::value_objects::ServiceId;
use async_trait::async_trait;
use dashmap::DashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use super::short_id;

/// In-memory container orchestration engine.
pub struct InMemoryComputePlatform {
    services: DashMap<String, ServiceSpec>,
}

impl InMemoryComputePlatform {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
        }
    }

    /// Number of services launched so far.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}

impl Default for InMemoryComputePlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ComputePlatform for InMemoryComputePlatform {
    async fn launch_service(&self, spec: &ServiceSpec) -> ComposeResult<ServiceRecord> {
        let id = format!("svc-{}", short_id());
        let endpoints = (0..spec.desired_count)
            .map(|i| {
                SocketAddr::new(
                    IpAddr::V4(Ipv4Addr::new(10, 0, 1, 10 + (i % 200) as u8)),
                    spec.container_port,
                )
            })
            .collect();

        self.services.insert(id.clone(), spec.clone());
        tracing::debug!(
            "launched service {} ({} x {} on port {})",
            id,
            spec.desired_count,
            spec.image,
            spec.container_port
        );
        Ok(ServiceRecord {
            id: ServiceId::new(id),
            cluster: spec.cluster_name.clone(),
            endpoints,
        })
    }
}
