mod boundary_composer;
mod network_resolver;
mod rule_engine;

pub use boundary_composer::build_boundaries;
pub use network_resolver::{
    default_network_plan, resolve, select_strategy, NetworkSelection, NetworkSource,
    NetworkStrategy, ResolvedNetwork,
};
pub use rule_engine::{Listener, RoutingRule, RuleAction};
