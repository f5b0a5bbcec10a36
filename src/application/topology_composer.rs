//! Topology Composer - Main application use case
//!
//! Runs the one-shot construction sequence: network, boundaries, frontend,
//! routing target, compute service, listener rules, identity gate, edge
//! distribution. Every component is built only after its dependencies; the
//! build is all-or-nothing and nothing is retried. All waiting for the
//! platforms to actually allocate resources happens behind the ports.

use crate::application::identity_binder::{register_identity, IdentityRegistration};
use crate::config::DeploymentContext;
use crate::domain::entities::{
    EdgeDistribution, FrontendRecord, HealthCheck, RoutingTarget, SecurityBoundary,
    ServiceRecord, SubnetGroup,
};
use crate::domain::errors::{ComposeError, ComposeResult};
use crate::domain::ports::{
    ComputePlatform, DistributionSpec, EdgePlatform, FrontendSpec, IdentityPlatform,
    NetworkProvider, ServiceSpec,
};
use crate::domain::services::{build_boundaries, resolve, Listener, NetworkSelection, ResolvedNetwork};
use crate::domain::value_objects::{
    AppProtocol, LogDelivery, LogDeliveryMode, MutationHook, OriginAddress, PathPattern,
    RoutingClass, ViewerProtocolPolicy,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// The fully constructed topology.
///
/// Holds the logical model of everything that was built, in construction
/// order. The network handle inside is shared read-only; nothing mutates it
/// after resolution.
#[derive(Debug, Clone)]
pub struct Topology {
    pub network: ResolvedNetwork,
    pub edge_boundary: SecurityBoundary,
    pub compute_boundary: SecurityBoundary,
    pub frontend: FrontendRecord,
    pub target: RoutingTarget,
    pub service: ServiceRecord,
    pub listener: Listener,
    pub identity: IdentityRegistration,
    pub distribution: EdgeDistribution,
}

impl Topology {
    /// The values surfaced to the operator after a successful build.
    pub fn outputs(&self) -> TopologyOutputs {
        TopologyOutputs {
            frontend_address: self.frontend.public_address.clone(),
            distribution_domain: self.distribution.domain_name.clone(),
            directory_id: self.identity.directory.id.clone(),
            client_id: self.identity.client.id.clone(),
        }
    }
}

/// Operator-facing outputs of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyOutputs {
    pub frontend_address: String,
    pub distribution_domain: String,
    pub directory_id: String,
    pub client_id: String,
}

/// Topology composer - main application use case.
///
/// Consumes the four platform ports and the deployment context, and builds
/// the whole topology in one pass.
pub struct TopologyComposer {
    network: Arc<dyn NetworkProvider>,
    compute: Arc<dyn ComputePlatform>,
    edge: Arc<dyn EdgePlatform>,
    identity: Arc<dyn IdentityPlatform>,
}

impl TopologyComposer {
    pub fn new(
        network: Arc<dyn NetworkProvider>,
        compute: Arc<dyn ComputePlatform>,
        edge: Arc<dyn EdgePlatform>,
        identity: Arc<dyn IdentityPlatform>,
    ) -> Self {
        Self {
            network,
            compute,
            edge,
            identity,
        }
    }

    /// Build the topology for the given deployment context.
    pub async fn build(&self, ctx: &DeploymentContext) -> ComposeResult<Topology> {
        // 1. Resolve the virtual network
        let selection = NetworkSelection {
            identifier: ctx.network_id.clone(),
            tag: ctx.network_name.clone(),
        };
        let network = resolve(&selection, &ctx.name_prefix, self.network.as_ref()).await?;

        // 2. Security boundaries: edge admits the world, compute admits edge
        let (edge_boundary, compute_boundary) = build_boundaries(
            &ctx.name_prefix,
            &network.handle.id,
            ctx.listener_port,
            ctx.container_port,
        );
        tracing::info!(
            "security boundaries declared: {} -> {}",
            edge_boundary.id,
            compute_boundary.id
        );

        // 3. Load-balancing frontend in the public subnet group
        let public = subnet_group(&network, RoutingClass::Public)?;
        let frontend = self
            .network
            .provision_frontend(&FrontendSpec {
                name: format!("{}-frontend", ctx.name_prefix),
                network: network.handle.id.clone(),
                subnet_ids: public.subnet_ids.clone(),
                boundary: edge_boundary.id.clone(),
                listener_port: ctx.listener_port,
                internet_facing: true,
            })
            .await?;
        tracing::info!("frontend provisioned at {}", frontend.public_address);

        // 4. Routing target with its health-check contract
        let mut target = RoutingTarget::new(
            format!("{}-web", ctx.name_prefix),
            ctx.container_port,
            AppProtocol::Http,
            HealthCheck {
                path: ctx.health_check_path.clone(),
                interval: Duration::from_secs(ctx.health_check_interval_secs),
            },
        );

        // 5. Compute service in the private-routed subnet group
        let private = subnet_group(&network, RoutingClass::PrivateRouted)?;
        let service = self
            .compute
            .launch_service(&ServiceSpec {
                cluster_name: format!("{}-cluster", ctx.name_prefix),
                service_name: format!("{}-service", ctx.name_prefix),
                image: ctx.image.clone(),
                cpu: ctx.cpu,
                memory_mib: ctx.memory_mib,
                container_port: ctx.container_port,
                desired_count: ctx.desired_count,
                network: network.handle.id.clone(),
                subnet_ids: private.subnet_ids.clone(),
                boundary: compute_boundary.id.clone(),
                assign_public_address: false,
                log_delivery: LogDelivery {
                    stream_prefix: ctx.log_stream_prefix.clone(),
                    mode: LogDeliveryMode::NonBlocking,
                },
            })
            .await?;
        tracing::info!(
            "compute service {} launched with {} endpoints",
            service.id,
            service.endpoints.len()
        );

        // 6. Bind the service into the target before any rule references it
        target.bind_service(&service)?;

        // 7. Listener with the catch-all forward route
        let mut listener = Listener::new(ctx.listener_port);
        listener.add_default_route(&target)?;

        // 8. Identity registration for the authentication gate
        let identity = register_identity(ctx, self.identity.as_ref()).await?;

        // 9. Gated rule: authenticate-then-forward for the secure paths
        let pattern = PathPattern::new(ctx.secure_path_pattern.clone())?;
        listener.add_conditional_route(
            ctx.secure_rule_priority,
            pattern,
            Some(identity.auth_gate()),
            &target,
        )?;

        // 10. Edge distribution fronting the frontend
        let distribution = self
            .edge
            .provision_distribution(&DistributionSpec {
                origin: OriginAddress {
                    hostname: frontend.public_address.clone(),
                    port: ctx.origin_http_port,
                },
                viewer_policy: ViewerProtocolPolicy::RedirectToHttps,
                hooks: vec![MutationHook::strip_header(ctx.strip_header.clone())],
                caching_disabled: true,
                allow_all_methods: true,
            })
            .await?;
        tracing::info!("edge distribution serving {}", distribution.domain_name);

        tracing::info!("topology construction complete");
        Ok(Topology {
            network,
            edge_boundary,
            compute_boundary,
            frontend,
            target,
            service,
            listener,
            identity,
            distribution,
        })
    }
}

/// The resolver already validated both classes exist; this keeps the
/// composer free of panicking lookups all the same.
fn subnet_group(
    network: &ResolvedNetwork,
    class: RoutingClass,
) -> ComposeResult<&SubnetGroup> {
    network.handle.subnet_group(class).ok_or_else(|| {
        ComposeError::Configuration(format!(
            "network '{}' has no {} subnet group",
            network.handle.id, class
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ClientRecord, DirectoryRecord, NetworkHandle};
    use crate::domain::ports::{ClientSpec, DirectorySpec, NetworkPlan};
    use crate::domain::services::NetworkSource;
    use crate::domain::value_objects::{NetworkId, ServiceId};
    use async_trait::async_trait;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use tracing_test::traced_test;

    // ===== Mock Platforms =====

    struct MockNetwork;

    #[async_trait]
    impl NetworkProvider for MockNetwork {
        async fn find_by_id(&self, _id: &NetworkId) -> ComposeResult<Option<NetworkHandle>> {
            Ok(None)
        }

        async fn find_by_tag(&self, _tag: &str) -> ComposeResult<Vec<NetworkHandle>> {
            Ok(Vec::new())
        }

        async fn create_network(&self, plan: &NetworkPlan) -> ComposeResult<NetworkHandle> {
            Ok(NetworkHandle {
                id: NetworkId::new("vpc-created"),
                subnet_groups: plan
                    .subnet_groups
                    .iter()
                    .map(|g| SubnetGroup {
                        name: g.name.clone(),
                        class: g.class,
                        subnet_ids: (1..=plan.availability_zones)
                            .map(|az| format!("subnet-{}-az{}", g.name, az))
                            .collect(),
                    })
                    .collect(),
            })
        }

        async fn provision_frontend(
            &self,
            spec: &FrontendSpec,
        ) -> ComposeResult<FrontendRecord> {
            Ok(FrontendRecord {
                id: "fe-1".to_string(),
                name: spec.name.clone(),
                public_address: format!("{}.frontend.internal", spec.name),
                listener_port: spec.listener_port,
            })
        }
    }

    struct MockCompute;

    #[async_trait]
    impl ComputePlatform for MockCompute {
        async fn launch_service(&self, spec: &ServiceSpec) -> ComposeResult<ServiceRecord> {
            Ok(ServiceRecord {
                id: ServiceId::new("svc-1"),
                cluster: spec.cluster_name.clone(),
                endpoints: (0..spec.desired_count)
                    .map(|i| {
                        SocketAddr::new(
                            IpAddr::V4(Ipv4Addr::new(10, 0, 1, 10 + i as u8)),
                            spec.container_port,
                        )
                    })
                    .collect(),
            })
        }
    }

    struct MockEdge;

    #[async_trait]
    impl EdgePlatform for MockEdge {
        async fn provision_distribution(
            &self,
            spec: &DistributionSpec,
        ) -> ComposeResult<EdgeDistribution> {
            Ok(EdgeDistribution {
                id: "dist-1".to_string(),
                domain_name: "dist-1.edge.example.net".to_string(),
                origin: spec.origin.clone(),
                viewer_policy: spec.viewer_policy,
                hooks: spec.hooks.clone(),
            })
        }
    }

    struct MockIdentity;

    #[async_trait]
    impl IdentityPlatform for MockIdentity {
        async fn create_directory(
            &self,
            spec: &DirectorySpec,
        ) -> ComposeResult<DirectoryRecord> {
            Ok(DirectoryRecord {
                id: "dir-1".to_string(),
                name: spec.name.clone(),
            })
        }

        async fn create_client(&self, spec: &ClientSpec) -> ComposeResult<ClientRecord> {
            Ok(ClientRecord {
                id: "client-1".to_string(),
                directory_id: spec.directory_id.clone(),
            })
        }

        async fn claim_hosted_domain(
            &self,
            _directory_id: &str,
            domain: &str,
        ) -> ComposeResult<String> {
            Ok(domain.to_string())
        }
    }

    struct FailingEdge;

    #[async_trait]
    impl EdgePlatform for FailingEdge {
        async fn provision_distribution(
            &self,
            _spec: &DistributionSpec,
        ) -> ComposeResult<EdgeDistribution> {
            Err(ComposeError::Platform("edge plane outage".to_string()))
        }
    }

    fn composer() -> TopologyComposer {
        TopologyComposer::new(
            Arc::new(MockNetwork),
            Arc::new(MockCompute),
            Arc::new(MockEdge),
            Arc::new(MockIdentity),
        )
    }

    // ===== Build Tests =====

    #[tokio::test]
    async fn test_build_assembles_consistent_topology() {
        let ctx = DeploymentContext::default();

        let topology = composer().build(&ctx).await.unwrap();

        // network was created, not looked up
        assert_eq!(topology.network.source, NetworkSource::Created);
        // compute is reachable only through the edge boundary
        assert!(topology
            .compute_boundary
            .only_admits(&topology.edge_boundary.id));
        // the target is bound and referenced by both listener actions
        assert!(topology.target.is_bound());
        assert_eq!(
            topology.listener.default_action().unwrap().target(),
            &topology.target.id
        );
        // the distribution fronts the frontend on the configured origin port
        assert_eq!(
            topology.distribution.origin.hostname,
            topology.frontend.public_address
        );
        assert_eq!(topology.distribution.origin.port, ctx.origin_http_port);
        assert_eq!(
            topology.distribution.viewer_policy,
            ViewerProtocolPolicy::RedirectToHttps
        );
    }

    #[tokio::test]
    async fn test_secure_paths_are_gated_and_others_are_not() {
        let ctx = DeploymentContext::default();

        let topology = composer().build(&ctx).await.unwrap();

        let gated = topology.listener.resolve_action("/secure/area").unwrap();
        assert!(gated.requires_authentication());
        let open = topology.listener.resolve_action("/").unwrap();
        assert!(!open.requires_authentication());
        // both actions share one target
        assert_eq!(gated.target(), open.target());
    }

    #[tokio::test]
    async fn test_outputs_are_non_empty() {
        let topology = composer().build(&DeploymentContext::default()).await.unwrap();

        let outputs = topology.outputs();
        assert!(!outputs.frontend_address.is_empty());
        assert!(!outputs.distribution_domain.is_empty());
        assert!(!outputs.directory_id.is_empty());
        assert!(!outputs.client_id.is_empty());
    }

    #[tokio::test]
    async fn test_platform_failure_aborts_the_build() {
        let composer = TopologyComposer::new(
            Arc::new(MockNetwork),
            Arc::new(MockCompute),
            Arc::new(FailingEdge),
            Arc::new(MockIdentity),
        );

        let err = composer.build(&DeploymentContext::default()).await.unwrap_err();

        assert_eq!(err, ComposeError::Platform("edge plane outage".to_string()));
    }

    #[traced_test]
    #[tokio::test]
    async fn test_build_logs_each_stage() {
        composer().build(&DeploymentContext::default()).await.unwrap();

        assert!(logs_contain("virtual network resolved"));
        assert!(logs_contain("security boundaries declared"));
        assert!(logs_contain("topology construction complete"));
    }
}
