mod in_memory_compute;
mod in_memory_edge;
mod in_memory_identity;
mod in_memory_network;

pub use in_memory_compute::InMemoryComputePlatform;
pub use in_memory_edge::InMemoryEdgePlatform;
pub use in_memory_identity::InMemoryIdentityPlatform;
pub use in_memory_network::InMemoryNetworkProvider;

/// Short identifier fragment for generated resource names.
pub(crate) fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}
