mod compute_platform;
mod edge_platform;
mod identity_platform;
mod network_provider;

pub use compute_platform::{ComputePlatform, ServiceSpec};
pub use edge_platform::{DistributionSpec, EdgePlatform};
pub use identity_platform::{ClientSpec, DirectorySpec, IdentityPlatform, VerificationTemplate};
pub use network_provider::{FrontendSpec, NetworkPlan, NetworkProvider, SubnetGroupPlan};
