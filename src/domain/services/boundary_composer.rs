//! Boundary Composer - Edge and compute security boundaries
//!
//! Pure construction, no error paths. The edge boundary admits the public
//! listener port from anywhere; the compute boundary admits the service port
//! from the edge boundary only. Compute is unreachable except through the
//! frontend, and the rule set says so structurally.

use crate::domain::entities::SecurityBoundary;
use crate::domain::value_objects::{NetworkId, TransportProtocol};

/// Build the edge-facing and compute-facing boundaries for the topology.
///
/// Boundary names derive from the deployment prefix, which keeps logical
/// names unique within one topology.
pub fn build_boundaries(
    name_prefix: &str,
    network: &NetworkId,
    listener_port: u16,
    service_port: u16,
) -> (SecurityBoundary, SecurityBoundary) {
    let mut edge = SecurityBoundary::new(
        format!("{}-edge", name_prefix),
        network.clone(),
        "Allow public traffic to the frontend listener",
    );
    edge.allow_from_anywhere(
        TransportProtocol::Tcp,
        listener_port,
        format!("Allow TCP {} from anywhere", listener_port),
    );

    let mut compute = SecurityBoundary::new(
        format!("{}-compute", name_prefix),
        network.clone(),
        "Allow traffic only from the frontend",
    );
    compute.allow_from_boundary(
        edge.id.clone(),
        TransportProtocol::Tcp,
        service_port,
        "Allow frontend to reach service tasks",
    );

    (edge, compute)
}
