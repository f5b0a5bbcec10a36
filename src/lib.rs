//! edgestack Library
//!
//! This module exposes the edgestack components for use in integration tests
//! and as a library.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

// Re-export commonly used types
pub use application::{register_identity, IdentityRegistration, Topology, TopologyComposer, TopologyOutputs};
pub use config::{load_config, DeploymentContext};
pub use domain::entities::{
    EdgeDistribution, FrontendRecord, HealthCheck, NetworkHandle, RoutingTarget,
    SecurityBoundary, ServiceRecord, SubnetGroup,
};
pub use domain::errors::{ComposeError, ComposeResult};
pub use domain::ports::{ComputePlatform, EdgePlatform, IdentityPlatform, NetworkProvider};
pub use domain::services::{Listener, NetworkSelection, NetworkSource, ResolvedNetwork, RuleAction};
pub use domain::value_objects::{AuthGate, MutationHook, NetworkId, PathPattern, RoutingClass};
