//! Edge Platform Port
//!
//! Defines the interface to the CDN engine. Cache-key semantics and hook
//! execution belong to the engine; this crate supplies the origin address,
//! the viewer-protocol policy, and the compiled mutation-hook chain.

use crate::domain::entities::EdgeDistribution;
use crate::domain::errors::ComposeResult;
use crate::domain::value_objects::{MutationHook, OriginAddress, ViewerProtocolPolicy};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Specification of an edge distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSpec {
    /// Exactly one origin, referenced by network address.
    pub origin: OriginAddress,
    pub viewer_policy: ViewerProtocolPolicy,
    /// Request mutation hooks, executed in order per viewer request.
    pub hooks: Vec<MutationHook>,
    /// The distribution fronts a dynamic service: caching stays off.
    pub caching_disabled: bool,
    pub allow_all_methods: bool,
}

/// Access to the edge-cache platform.
#[async_trait]
pub trait EdgePlatform: Send + Sync {
    /// Provision a distribution and report its public domain.
    async fn provision_distribution(
        &self,
        spec: &DistributionSpec,
    ) -> ComposeResult<EdgeDistribution>;
}
