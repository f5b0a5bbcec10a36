//! Network Resolver - Strategy selection and network resolution
//!
//! Obtaining the virtual network is the one place in construction with a
//! real precedence rule, so the whole decision is sealed into a single
//! exhaustive function instead of conditionals spread through the composer:
//! an explicit identifier wins over a name tag, and a name tag wins over
//! creating a fresh network. Ambiguous tag lookups fail hard: silently
//! picking a network would relocate the entire topology.

use crate::domain::entities::NetworkHandle;
use crate::domain::errors::{ComposeError, ComposeResult};
use crate::domain::ports::{NetworkPlan, NetworkProvider, SubnetGroupPlan};
use crate::domain::value_objects::{NetworkId, RoutingClass};
use serde::{Deserialize, Serialize};

/// Network selection inputs, already merged across configuration sources
/// (explicit context first, process environment as fallback).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkSelection {
    pub identifier: Option<String>,
    pub tag: Option<String>,
}

/// The resolution strategy chosen for a deployment. Mutually exclusive;
/// produced by [`select_strategy`] before any platform call is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkStrategy {
    /// Look up an existing network by identifier.
    ByIdentifier(NetworkId),
    /// Look up an existing network by its name tag.
    ByTag(String),
    /// Create a fresh network with the fixed default plan.
    Create,
}

/// How the resolved network was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkSource {
    ByIdentifier,
    ByTag,
    Created,
}

/// The deployment's single network handle plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedNetwork {
    pub handle: NetworkHandle,
    pub source: NetworkSource,
}

/// Pick the resolution strategy for the given selection.
///
/// Precedence is total and deterministic: identifier, then tag, then
/// create. A selector that is present but blank is a configuration error,
/// never a silent fall-through to the next strategy.
pub fn select_strategy(selection: &NetworkSelection) -> ComposeResult<NetworkStrategy> {
    if let Some(id) = &selection.identifier {
        if id.trim().is_empty() {
            return Err(ComposeError::Configuration(
                "network identifier is set but blank".to_string(),
            ));
        }
        return Ok(NetworkStrategy::ByIdentifier(NetworkId::new(id.clone())));
    }
    if let Some(tag) = &selection.tag {
        if tag.trim().is_empty() {
            return Err(ComposeError::Configuration(
                "network tag is set but blank".to_string(),
            ));
        }
        return Ok(NetworkStrategy::ByTag(tag.clone()));
    }
    Ok(NetworkStrategy::Create)
}

/// The fixed plan used by the create strategy: two availability zones, one
/// NAT egress path, one public and one private-routed subnet group with /24
/// address blocks.
pub fn default_network_plan(name_prefix: &str) -> NetworkPlan {
    NetworkPlan {
        name: format!("{}-network", name_prefix),
        availability_zones: 2,
        nat_gateways: 1,
        subnet_groups: vec![
            SubnetGroupPlan {
                name: "public".to_string(),
                class: RoutingClass::Public,
                cidr_mask: 24,
            },
            SubnetGroupPlan {
                name: "private".to_string(),
                class: RoutingClass::PrivateRouted,
                cidr_mask: 24,
            },
        ],
    }
}

/// Resolve the deployment's virtual network against the provider.
///
/// Exactly one handle is produced per deployment; it is validated to carry
/// both subnet classes the topology places resources into.
pub async fn resolve(
    selection: &NetworkSelection,
    name_prefix: &str,
    provider: &dyn NetworkProvider,
) -> ComposeResult<ResolvedNetwork> {
    let resolved = match select_strategy(selection)? {
        NetworkStrategy::ByIdentifier(id) => {
            let handle = provider.find_by_id(&id).await?.ok_or_else(|| {
                ComposeError::NotFound(format!("no network with identifier '{}'", id))
            })?;
            ResolvedNetwork {
                handle,
                source: NetworkSource::ByIdentifier,
            }
        }
        NetworkStrategy::ByTag(tag) => {
            let mut matches = provider.find_by_tag(&tag).await?;
            match matches.len() {
                0 => {
                    return Err(ComposeError::NotFound(format!(
                        "no network tagged '{}'",
                        tag
                    )))
                }
                1 => ResolvedNetwork {
                    handle: matches.remove(0),
                    source: NetworkSource::ByTag,
                },
                n => {
                    return Err(ComposeError::AmbiguousMatch {
                        tag,
                        matches: n,
                    })
                }
            }
        }
        NetworkStrategy::Create => {
            let plan = default_network_plan(name_prefix);
            let handle = provider.create_network(&plan).await?;
            ResolvedNetwork {
                handle,
                source: NetworkSource::Created,
            }
        }
    };

    validate_subnet_classes(&resolved.handle)?;
    tracing::info!(
        network = %resolved.handle.id,
        source = ?resolved.source,
        "virtual network resolved"
    );
    Ok(resolved)
}

/// A network without both a public and a private-routed subnet group cannot
/// host the topology, whichever strategy produced it.
fn validate_subnet_classes(handle: &NetworkHandle) -> ComposeResult<()> {
    for class in [RoutingClass::Public, RoutingClass::PrivateRouted] {
        if !handle.has_class(class) {
            return Err(ComposeError::Configuration(format!(
                "network '{}' has no {} subnet group",
                handle.id, class
            )));
        }
    }
    Ok(())
}
