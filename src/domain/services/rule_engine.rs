//! Listener Rule Engine - Ordered routing rules with composite actions
//!
//! A listener holds exactly one default (conditionless) action and any
//! number of conditional rules with unique priorities. Evaluation walks the
//! rules in ascending priority and the first matching rule wins; the default
//! action is the catch-all. Whether a path requires authentication is a
//! property of the rule's action variant, inspectable without executing
//! anything.

use crate::domain::entities::RoutingTarget;
use crate::domain::errors::{ComposeError, ComposeResult};
use crate::domain::value_objects::{AppProtocol, AuthGate, PathPattern, TargetId};
use serde::{Deserialize, Serialize};

/// Action taken by a matching rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleAction {
    /// Forward the request to the routing target.
    Forward { target: TargetId },
    /// Authenticate against the identity provider, then forward. If
    /// authentication fails or is incomplete, control never reaches the
    /// forward step; the redirect protocol belongs to the identity platform.
    AuthenticateThenForward { gate: AuthGate, target: TargetId },
}

impl RuleAction {
    /// The routing target this action ultimately forwards to.
    pub fn target(&self) -> &TargetId {
        match self {
            Self::Forward { target } => target,
            Self::AuthenticateThenForward { target, .. } => target,
        }
    }

    pub fn requires_authentication(&self) -> bool {
        matches!(self, Self::AuthenticateThenForward { .. })
    }
}

/// One conditional routing rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    pub priority: u16,
    pub condition: PathPattern,
    pub action: RuleAction,
}

/// The component evaluating ordered routing rules against incoming requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listener {
    port: u16,
    protocol: AppProtocol,
    default_action: Option<RuleAction>,
    /// Conditional rules, kept sorted by ascending priority.
    rules: Vec<RoutingRule>,
}

impl Listener {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            protocol: AppProtocol::Http,
            default_action: None,
            rules: Vec::new(),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> AppProtocol {
        self.protocol
    }

    pub fn default_action(&self) -> Option<&RuleAction> {
        self.default_action.as_ref()
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Install the catch-all forward action.
    ///
    /// A listener has exactly one default action; installing a second is a
    /// conflict. The target must already be bound to a service.
    pub fn add_default_route(&mut self, target: &RoutingTarget) -> ComposeResult<()> {
        require_bound(target)?;
        if self.default_action.is_some() {
            return Err(ComposeError::Conflict(format!(
                "listener on port {} already has a default action",
                self.port
            )));
        }
        self.default_action = Some(RuleAction::Forward {
            target: target.id.clone(),
        });
        tracing::debug!("default route on port {} -> {}", self.port, target.id);
        Ok(())
    }

    /// Install a path-matched rule at the given priority.
    ///
    /// With a gate the action becomes the authenticate-then-forward
    /// composite; without one it is a plain forward. Either way the rule
    /// shares the target with every other rule pointing at it; the target
    /// is referenced, not duplicated.
    pub fn add_conditional_route(
        &mut self,
        priority: u16,
        condition: PathPattern,
        gate: Option<AuthGate>,
        target: &RoutingTarget,
    ) -> ComposeResult<()> {
        require_bound(target)?;
        if self.rules.iter().any(|rule| rule.priority == priority) {
            return Err(ComposeError::Conflict(format!(
                "listener on port {} already has a rule at priority {}",
                self.port, priority
            )));
        }

        let action = match gate {
            Some(gate) => RuleAction::AuthenticateThenForward {
                gate,
                target: target.id.clone(),
            },
            None => RuleAction::Forward {
                target: target.id.clone(),
            },
        };

        tracing::debug!(
            "rule p{} '{}' on port {} -> {} (auth: {})",
            priority,
            condition,
            self.port,
            target.id,
            action.requires_authentication()
        );
        self.rules.push(RoutingRule {
            priority,
            condition,
            action,
        });
        self.rules.sort_by_key(|rule| rule.priority);
        Ok(())
    }

    /// Resolve the action for a request path: ascending priority, first
    /// match wins, default as the terminal catch-all. `None` only before
    /// the default action is installed.
    pub fn resolve_action(&self, path: &str) -> Option<&RuleAction> {
        self.rules
            .iter()
            .find(|rule| rule.condition.matches(path))
            .map(|rule| &rule.action)
            .or(self.default_action.as_ref())
    }
}

/// Listener rules may only reference targets that already have a backing
/// service; anything else is a construction-order violation.
fn require_bound(target: &RoutingTarget) -> ComposeResult<()> {
    if !target.is_bound() {
        return Err(ComposeError::Configuration(format!(
            "routing target '{}' has no bound service",
            target.id
        )));
    }
    Ok(())
}
