//! Integration tests for topology construction
//!
//! Runs the full composer against the in-memory platform adapters and
//! checks the end-to-end construction contract: network resolution
//! precedence, the security invariant, listener behavior, and the
//! operator outputs.

use edgestack::adapters::outbound::{
    InMemoryComputePlatform, InMemoryEdgePlatform, InMemoryIdentityPlatform,
    InMemoryNetworkProvider,
};
use edgestack::domain::value_objects::{MutationHook, ViewerProtocolPolicy};
use edgestack::{
    ComposeError, DeploymentContext, NetworkHandle, NetworkId, NetworkSource, RoutingClass,
    SubnetGroup, TopologyComposer,
};
use std::sync::Arc;

// ===== Test Helpers =====

fn fixture_network(id: &str) -> NetworkHandle {
    NetworkHandle {
        id: NetworkId::new(id),
        subnet_groups: vec![
            SubnetGroup {
                name: "public".to_string(),
                class: RoutingClass::Public,
                subnet_ids: vec![format!("{}-public-az1", id), format!("{}-public-az2", id)],
            },
            SubnetGroup {
                name: "private".to_string(),
                class: RoutingClass::PrivateRouted,
                subnet_ids: vec![format!("{}-private-az1", id), format!("{}-private-az2", id)],
            },
        ],
    }
}

fn composer_with(network: InMemoryNetworkProvider) -> TopologyComposer {
    TopologyComposer::new(
        Arc::new(network),
        Arc::new(InMemoryComputePlatform::new()),
        Arc::new(InMemoryEdgePlatform::new()),
        Arc::new(InMemoryIdentityPlatform::new()),
    )
}

/// End-to-end scenario: resolve by identifier, build everything, check the
/// outputs and the structural invariants of the assembled model.
#[tokio::test]
async fn test_end_to_end_build_with_explicit_identifier() {
    let ctx = DeploymentContext {
        network_id: Some("vpc-123".to_string()),
        ..DeploymentContext::default()
    };
    let network = InMemoryNetworkProvider::new().with_network(fixture_network("vpc-123"), None);

    let topology = composer_with(network).build(&ctx).await.unwrap();

    // network came from the identifier lookup
    assert_eq!(topology.network.source, NetworkSource::ByIdentifier);
    assert_eq!(topology.network.handle.id.as_str(), "vpc-123");

    // compute admits only the edge boundary
    assert!(topology
        .compute_boundary
        .only_admits(&topology.edge_boundary.id));

    // target: health contract and binding
    assert_eq!(topology.target.health_check.path, "/");
    assert_eq!(topology.target.health_check.interval.as_secs(), 30);
    assert!(topology.target.is_bound());
    assert_eq!(topology.target.endpoints().len(), 2);

    // listener: gated /secure/*, plain everything else
    let gated = topology.listener.resolve_action("/secure/admin").unwrap();
    assert!(gated.requires_authentication());
    let open = topology.listener.resolve_action("/index.html").unwrap();
    assert!(!open.requires_authentication());
    assert_eq!(gated.target(), open.target());

    // distribution fronts the frontend on the configured origin port
    assert_eq!(
        topology.distribution.origin.hostname,
        topology.frontend.public_address
    );
    assert_eq!(topology.distribution.origin.port, 8080);
    assert_eq!(
        topology.distribution.viewer_policy,
        ViewerProtocolPolicy::RedirectToHttps
    );
    assert_eq!(
        topology.distribution.hooks,
        vec![MutationHook::strip_header("x-exploit-activate")]
    );

    // operator outputs are all non-empty
    let outputs = topology.outputs();
    assert!(!outputs.frontend_address.is_empty());
    assert!(!outputs.distribution_domain.is_empty());
    assert!(!outputs.directory_id.is_empty());
    assert!(!outputs.client_id.is_empty());
}

#[tokio::test]
async fn test_created_network_has_both_routing_classes() {
    let ctx = DeploymentContext::default();

    let topology = composer_with(InMemoryNetworkProvider::new())
        .build(&ctx)
        .await
        .unwrap();

    assert_eq!(topology.network.source, NetworkSource::Created);
    let classes: Vec<RoutingClass> = topology
        .network
        .handle
        .subnet_groups
        .iter()
        .map(|g| g.class)
        .collect();
    assert_eq!(
        classes,
        vec![RoutingClass::Public, RoutingClass::PrivateRouted]
    );
}

#[tokio::test]
async fn test_identifier_wins_over_conflicting_tag() {
    let ctx = DeploymentContext {
        network_id: Some("vpc-123".to_string()),
        network_name: Some("shared".to_string()),
        ..DeploymentContext::default()
    };
    let network = InMemoryNetworkProvider::new()
        .with_network(fixture_network("vpc-123"), None)
        .with_network(fixture_network("vpc-tagged"), Some("shared"));

    let topology = composer_with(network).build(&ctx).await.unwrap();

    assert_eq!(topology.network.source, NetworkSource::ByIdentifier);
    assert_eq!(topology.network.handle.id.as_str(), "vpc-123");
}

#[tokio::test]
async fn test_ambiguous_tag_fails_the_build() {
    let ctx = DeploymentContext {
        network_name: Some("shared".to_string()),
        ..DeploymentContext::default()
    };
    let network = InMemoryNetworkProvider::new()
        .with_network(fixture_network("vpc-a"), Some("shared"))
        .with_network(fixture_network("vpc-b"), Some("shared"));

    let err = composer_with(network).build(&ctx).await.unwrap_err();

    assert_eq!(
        err,
        ComposeError::AmbiguousMatch {
            tag: "shared".to_string(),
            matches: 2
        }
    );
}

#[tokio::test]
async fn test_unknown_identifier_fails_the_build() {
    let ctx = DeploymentContext {
        network_id: Some("vpc-missing".to_string()),
        ..DeploymentContext::default()
    };

    let err = composer_with(InMemoryNetworkProvider::new())
        .build(&ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, ComposeError::NotFound(_)));
}

#[tokio::test]
async fn test_network_quota_surfaces_unchanged() {
    let ctx = DeploymentContext::default();
    let network = InMemoryNetworkProvider::new().with_network_quota(0);

    let err = composer_with(network).build(&ctx).await.unwrap_err();

    assert!(matches!(err, ComposeError::Quota(_)));
}

#[tokio::test]
async fn test_hosted_domain_collision_is_retried() {
    let ctx = DeploymentContext {
        name_prefix: "webapp".to_string(),
        account_id: Some("123456789012".to_string()),
        ..DeploymentContext::default()
    };
    // the account-derived candidate is already taken platform-wide
    let identity = InMemoryIdentityPlatform::new().with_claimed_domain("webapp-789012");
    let composer = TopologyComposer::new(
        Arc::new(InMemoryNetworkProvider::new()),
        Arc::new(InMemoryComputePlatform::new()),
        Arc::new(InMemoryEdgePlatform::new()),
        Arc::new(identity),
    );

    let topology = composer.build(&ctx).await.unwrap();

    assert_ne!(topology.identity.hosted_domain, "webapp-789012");
    assert!(topology.identity.hosted_domain.starts_with("webapp-"));
}

#[tokio::test]
async fn test_edge_hook_strips_untrusted_header() {
    let topology = composer_with(InMemoryNetworkProvider::new())
        .build(&DeploymentContext::default())
        .await
        .unwrap();

    // replay what the edge would execute per viewer request
    let mut headers: edgestack::domain::value_objects::HeaderMap = [
        ("host".to_string(), "example.com".to_string()),
        ("X-Exploit-Activate".to_string(), "1".to_string()),
    ]
    .into_iter()
    .collect();
    MutationHook::apply_chain(&topology.distribution.hooks, &mut headers);

    assert!(!headers.contains_key("X-Exploit-Activate"));
    assert!(headers.contains_key("host"));
}
