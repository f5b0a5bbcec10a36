//! In-Memory Edge Platform
//!
//! Simulates the CDN engine: provisioning a distribution yields a generated
//! public domain. The hook chain and policy are recorded verbatim so tests
//! can inspect what would be compiled for the edge.

use crate::domain::entities::EdgeDistribution;
use crate::domain::errors::ComposeResult;
use crate::domain::ports::{DistributionSpec, EdgePlatform};
use async_trait::async_trait;
use dashmap::DashMap;

use super::short_id;

/// In-memory edge-cache platform.
pub struct InMemoryEdgePlatform {
    distributions: DashMap<String, EdgeDistribution>,
}

impl InMemoryEdgePlatform {
    pub fn new() -> Self {
        Self {
            distributions: DashMap::new(),
        }
    }

    /// Number of distributions provisioned so far.
    pub fn distribution_count(&self) -> usize {
        self.distributions.len()
    }
}

impl Default for InMemoryEdgePlatform {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EdgePlatform for InMemoryEdgePlatform {
    async fn provision_distribution(
        &self,
        spec: &DistributionSpec,
    ) -> ComposeResult<EdgeDistribution> {
        let id = format!("dist-{}", short_id());
        let distribution = EdgeDistribution {
            id: id.clone(),
            domain_name: format!("{}.edge.example.net", id),
            origin: spec.origin.clone(),
            viewer_policy: spec.viewer_policy,
            hooks: spec.hooks.clone(),
        };

        self.distributions.insert(id, distribution.clone());
        tracing::debug!(
            "provisioned distribution {} -> {}:{}",
            distribution.domain_name,
            spec.origin.hostname,
            spec.origin.port
        );
        Ok(distribution)
    }
}
