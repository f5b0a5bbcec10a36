//! In-Memory Network Provider
//!
//! Simulates the virtual-network plane: seedable fixture networks for
//! lookups, create-on-demand with generated identifiers, an optional
//! network quota, and frontend allocation. Backs the binary's standalone
//! mode and the integration tests.

use crate::domain::entities::{FrontendRecord, NetworkHandle, SubnetGroup};
use crate::domain::errors::{ComposeError, ComposeResult};
use crate::domain::ports::{FrontendSpec, NetworkPlan, NetworkProvider};
use crate::domain::value_objects::NetworkId;
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::short_id;

struct SeededNetwork {
    handle: NetworkHandle,
    tag: Option<String>,
}

/// In-memory network plane.
pub struct InMemoryNetworkProvider {
    networks: DashMap<String, SeededNetwork>,
    frontends: DashMap<String, FrontendRecord>,
    created: Mutex<usize>,
    network_quota: Option<usize>,
}

impl InMemoryNetworkProvider {
    pub fn new() -> Self {
        Self {
            networks: DashMap::new(),
            frontends: DashMap::new(),
            created: Mutex::new(0),
            network_quota: None,
        }
    }

    /// Seed a fixture network visible to lookups, optionally under a tag.
    pub fn with_network(self, handle: NetworkHandle, tag: Option<&str>) -> Self {
        self.networks.insert(
            handle.id.as_str().to_string(),
            SeededNetwork {
                handle,
                tag: tag.map(str::to_string),
            },
        );
        self
    }

    /// Cap the number of networks `create_network` may allocate.
    pub fn with_network_quota(mut self, quota: usize) -> Self {
        self.network_quota = Some(quota);
        self
    }

    /// Number of frontends allocated so far.
    pub fn frontend_count(&self) -> usize {
        self.frontends.len()
    }
}

impl Default for InMemoryNetworkProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkProvider for InMemoryNetworkProvider {
    async fn find_by_id(&self, id: &NetworkId) -> ComposeResult<Option<NetworkHandle>> {
        Ok(self.networks.get(id.as_str()).map(|e| e.handle.clone()))
    }

    async fn find_by_tag(&self, tag: &str) -> ComposeResult<Vec<NetworkHandle>> {
        let mut matches: Vec<NetworkHandle> = self
            .networks
            .iter()
            .filter(|e| e.tag.as_deref() == Some(tag))
            .map(|e| e.handle.clone())
            .collect();
        // stable order for callers counting matches
        matches.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(matches)
    }

    async fn create_network(&self, plan: &NetworkPlan) -> ComposeResult<NetworkHandle> {
        {
            let mut created = self.created.lock();
            if let Some(quota) = self.network_quota {
                if *created >= quota {
                    return Err(ComposeError::Quota(format!(
                        "network quota of {} reached",
                        quota
                    )));
                }
            }
            *created += 1;
        }

        let id = format!("net-{}", short_id());
        let subnet_groups = plan
            .subnet_groups
            .iter()
            .map(|group| SubnetGroup {
                name: group.name.clone(),
                class: group.class,
                subnet_ids: (1..=plan.availability_zones)
                    .map(|az| format!("{}-{}-az{}", id, group.name, az))
                    .collect(),
            })
            .collect();
        let handle = NetworkHandle {
            id: NetworkId::new(id.clone()),
            subnet_groups,
        };

        self.networks.insert(
            id.clone(),
            SeededNetwork {
                handle: handle.clone(),
                tag: Some(plan.name.clone()),
            },
        );
        tracing::debug!(
            "created network {} ({} zones, {} subnet groups)",
            id,
            plan.availability_zones,
            handle.subnet_groups.len()
        );
        Ok(handle)
    }

    async fn provision_frontend(&self, spec: &FrontendSpec) -> ComposeResult<FrontendRecord> {
        let id = format!("fe-{}", short_id());
        let record = FrontendRecord {
            id: id.clone(),
            name: spec.name.clone(),
            public_address: format!("{}-{}.frontend.internal", spec.name, short_id()),
            listener_port: spec.listener_port,
        };
        self.frontends.insert(id, record.clone());
        tracing::debug!(
            "provisioned frontend {} in {} subnets",
            record.public_address,
            spec.subnet_ids.len()
        );
        Ok(record)
    }
}
